//! Built-in optimization passes, in pipeline order.

pub mod constant_folding;
pub mod dead_code;
pub mod loop_unrolling;
pub mod selector_caching;

pub use constant_folding::ConstantFolding;
pub use dead_code::DeadCodeElimination;
pub use loop_unrolling::LoopUnrolling;
pub use selector_caching::SelectorCaching;
