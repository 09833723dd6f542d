//! edge list and json document io for graphs and samples

pub mod edgelist;

pub mod graphjson;
