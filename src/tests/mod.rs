pub mod support;

mod channels;
mod web;
