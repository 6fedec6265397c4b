// Library root
// -----------
// The binary (`main.rs`) wires these modules together.
//
// Module responsibilities:
// - `client`: blocking HTTP calls to the integrated-search service.
// - `poll`: bounded fixed-interval polling until a task resolves.
// - `extract`: defensive mapping of the result document to a flat term.
// - `query`: the end-to-end submit / poll / fetch / extract workflow.
pub mod client;
pub mod extract;
pub mod poll;
pub mod query;
