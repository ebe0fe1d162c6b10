/// What came back from a single GET.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// Final URL after redirects.
    pub url: String,
    pub status_code: u16,
    pub content_type: Option<String>,
    /// `Location` header, only interesting when redirects are not followed.
    pub location: Option<String>,
    pub body: String,
}

impl FetchResponse {
    pub fn is_ok(&self) -> bool {
        self.status_code == 200
    }
}
