// Export components
pub mod calendar_store;
pub mod suggestion;
pub mod text_generation;

// Re-export the collaborator seams
pub use calendar_store::CalendarStore;
pub use suggestion::SuggestionService;
pub use text_generation::TextGenerator;
