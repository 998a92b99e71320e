pub mod distractor;
pub mod filter;
pub mod highlight;
pub mod pool;

pub use filter::FilterState;
pub use highlight::{HighlightedSentence, highlight};
pub use pool::{Draw, QuestionPool};
