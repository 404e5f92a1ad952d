pub mod document;
pub mod download;
pub mod search;
mod timestamp;

pub use document::{
    DocumentInfo, DocumentListRequest, DocumentListResponse, FileUploadResponse, UploadOptions,
};
pub use download::{DownloadFileRequest, DownloadTokenRequest, DownloadTokenResponse, DownloadedFile};
pub use search::{SearchRequest, SearchResponse, SearchResult};
