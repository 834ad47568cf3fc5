pub mod auth;
pub mod banner;
pub mod compare;
pub mod config;
pub mod consts;
pub mod gallery;
pub mod highlight;
pub mod reader;
pub mod registry;
pub mod spinner;
pub mod web;
