pub mod answer_panel;
pub mod context_sidebar;
pub mod filter_bar;
pub mod progress_bar;
pub mod sentence_card;
