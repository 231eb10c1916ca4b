pub mod config;
pub mod convert;
pub mod counters;
pub mod domain;
pub mod error;
pub mod graph;
pub mod identifier;
pub mod kgml;
pub mod knowledge;
pub mod mapper;
pub mod model;
pub mod output;
pub mod pathway;
pub mod provenance;
pub mod store;
