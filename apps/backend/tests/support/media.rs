use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bookstore_backend::media::{MediaError, MediaHost, UploadedMedia};

pub const FAKE_HOST: &str = "https://res.cloudinary.com/test-cloud/image/upload";

/// In-process media host that records destroy calls.
#[derive(Debug, Default)]
pub struct FakeMediaHost {
    uploads: AtomicUsize,
    destroyed: Mutex<Vec<String>>,
    fail_uploads: AtomicBool,
    fail_destroys: AtomicBool,
}

impl FakeMediaHost {
    pub fn failing_uploads() -> Self {
        let host = Self::default();
        host.fail_uploads.store(true, Ordering::SeqCst);
        host
    }

    pub fn fail_destroys(&self) {
        self.fail_destroys.store(true, Ordering::SeqCst);
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn destroyed(&self) -> Vec<String> {
        self.destroyed.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaHost for FakeMediaHost {
    async fn upload(&self, _source: &str, folder: &str) -> Result<UploadedMedia, MediaError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(MediaError::Rejected {
                status: 400,
                detail: "Invalid image file".into(),
            });
        }
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        let public_id = format!("{folder}/cover{n}");
        Ok(UploadedMedia {
            secure_url: format!("{FAKE_HOST}/v1700000000/{public_id}.png"),
            public_id,
        })
    }

    async fn destroy(&self, public_id: &str) -> Result<(), MediaError> {
        self.destroyed.lock().unwrap().push(public_id.to_string());
        if self.fail_destroys.load(Ordering::SeqCst) {
            return Err(MediaError::Transport("connection reset".into()));
        }
        Ok(())
    }

    fn owns_url(&self, url: &str) -> bool {
        url.starts_with(FAKE_HOST)
    }
}
