mod support;

mod catalog;
mod config;
mod search;
