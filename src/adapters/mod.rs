// Adapters layer: concrete implementations of the domain ports (file storage, persistence, workbooks).

pub mod repository;
pub mod storage;
pub mod workbook;

pub use repository::JsonRepository;
pub use storage::LocalStorage;
pub use workbook::XlsxReader;
