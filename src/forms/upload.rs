use actix_multipart::form::{MultipartForm, tempfile::TempFile};

#[derive(MultipartForm)]
/// Multipart body of `POST /api/v1/clients/upload`.
pub struct UploadClientsForm {
    #[multipart(limit = "10MB")]
    pub csv: TempFile,
}

impl UploadClientsForm {
    /// Opens the uploaded sheet from the start.
    pub fn open(&self) -> std::io::Result<std::fs::File> {
        std::fs::File::open(self.csv.file.path())
    }
}
