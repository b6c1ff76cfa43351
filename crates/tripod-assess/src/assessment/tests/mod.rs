mod common;
mod dispatcher;
mod service;
