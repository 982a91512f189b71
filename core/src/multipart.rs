//! Minimal `multipart/form-data` encoder for the photo upload endpoints.
//!
//! Only what the PetFriends API needs: text fields followed by at most one
//! file part. The boundary is a random UUID, which cannot occur in UTF-8
//! text fields and is vanishingly unlikely inside image bytes.

use uuid::Uuid;

use crate::photo::PhotoUpload;

pub(crate) struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartForm {
    pub(crate) fn new() -> Self {
        Self::with_boundary(format!("petfriends-{}", Uuid::new_v4().simple()))
    }

    pub(crate) fn with_boundary(boundary: String) -> Self {
        Self {
            boundary,
            body: Vec::new(),
        }
    }

    pub(crate) fn text(mut self, name: &str, value: &str) -> Self {
        self.open_part();
        self.push(&format!(
            "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
            escape_quoted(name)
        ));
        self.push(value);
        self.push("\r\n");
        self
    }

    pub(crate) fn file(mut self, name: &str, photo: &PhotoUpload) -> Self {
        self.open_part();
        self.push(&format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            escape_quoted(name),
            escape_quoted(&photo.file_name)
        ));
        self.push(&format!("Content-Type: {}\r\n\r\n", photo.content_type));
        self.body.extend_from_slice(&photo.bytes);
        self.push("\r\n");
        self
    }

    /// Close the form. Returns the `content-type` header value and the body.
    pub(crate) fn finish(mut self) -> (String, Vec<u8>) {
        let closing = format!("--{}--\r\n", self.boundary);
        self.push(&closing);
        (
            format!("multipart/form-data; boundary={}", self.boundary),
            self.body,
        )
    }

    fn open_part(&mut self) {
        let delimiter = format!("--{}\r\n", self.boundary);
        self.push(&delimiter);
    }

    fn push(&mut self, text: &str) {
        self.body.extend_from_slice(text.as_bytes());
    }
}

fn escape_quoted(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
