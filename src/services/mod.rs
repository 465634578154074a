pub mod candidate_filter;
pub mod genre_directory;
pub mod preference_store;
pub mod providers;
pub mod recommendations;
pub mod stats;
pub mod title_search;
