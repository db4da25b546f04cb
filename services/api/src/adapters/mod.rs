pub mod db;
pub mod memory;
pub mod refine_llm;
pub mod scoring;

pub use db::DbAdapter;
pub use memory::InMemoryDatabase;
pub use refine_llm::OpenAiRefineAdapter;
pub use scoring::HttpScoringAdapter;
