// ABOUTME: Library crate for sellcar exposing the wizard engine, marketplace client and CLI

#![allow(missing_docs)]

pub mod api;
pub mod cli;
pub mod config;
pub mod draft;
pub mod submission;
pub mod wizard;
