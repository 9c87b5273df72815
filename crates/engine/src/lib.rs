pub mod ai;
pub mod column;
pub mod error;
pub mod filter;
pub mod group;
pub mod pipeline;
pub mod relation;
pub mod sheet;
pub mod sort;
pub mod value;
pub mod view;
pub mod workspace;
