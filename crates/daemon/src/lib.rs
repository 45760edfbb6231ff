#![forbid(unsafe_code)]

//! HTTP front end for the feedback form: HTML pages plus a small JSON API.

pub mod config;
pub mod http;
pub mod pages;
