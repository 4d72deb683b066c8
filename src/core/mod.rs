pub mod assembler;
pub mod classify;
pub mod layout;
pub mod parser;
pub mod pipeline;
pub mod validator;
