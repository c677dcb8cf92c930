pub mod detail_entry_repository;

pub use detail_entry_repository::DetailEntryRepository;
