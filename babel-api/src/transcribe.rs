//! Speech transcription.

use babel_http_client::{HttpClientError, multipart};
use babel_log::debug;
use serde_json::Value;
use std::fmt;
use std::path::Path;

use crate::client::json_body;
use crate::{ApiError, BabelClient, Result};

pub const TRANSCRIBE_PATH: &str = "/transcript-speech";

/// Multipart field carrying the audio file.
pub const AUDIO_FIELD: &str = "audio-file";

/// Extensions the transcription service accepts.
pub const SUPPORTED_AUDIO_EXTENSIONS: [&str; 4] = ["mp3", "aac", "wav", "ogg"];

/// One audio file to transcribe.
#[derive(Debug, Clone)]
pub struct AudioUpload {
    file_name: String,
    bytes: Vec<u8>,
}

impl AudioUpload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read an audio file from disk.
    ///
    /// The extension is checked before the file is read.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ApiError::Integrity(format!("{} is not a file", path.display())))?;
        audio_mime(&file_name)?;

        let bytes = tokio::fs::read(path).await?;
        Ok(Self { file_name, bytes })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lowercased extension, empty when the name has none.
    pub fn extension(&self) -> String {
        extension_of(&self.file_name)
    }

    /// Check the extension against [`SUPPORTED_AUDIO_EXTENSIONS`].
    pub fn validate(&self) -> Result<()> {
        audio_mime(&self.file_name).map(|_| ())
    }
}

fn extension_of(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default()
}

fn audio_mime(file_name: &str) -> Result<&'static str> {
    match extension_of(file_name).as_str() {
        "mp3" => Ok("audio/mpeg"),
        "aac" => Ok("audio/aac"),
        "wav" => Ok("audio/wav"),
        "ogg" => Ok("audio/ogg"),
        other => Err(ApiError::UnsupportedAudio(other.to_string())),
    }
}

/// A transcript and the service's confidence in it (0.0 to 1.0).
#[derive(Debug, Clone, PartialEq)]
pub struct Transcription {
    pub text: String,
    pub confidence: f64,
}

impl Transcription {
    /// Confidence as shown to users, e.g. `Confidence: 93.12%`.
    pub fn confidence_label(&self) -> String {
        format!("Confidence: {:.2}%", self.confidence * 100.0)
    }
}

impl fmt::Display for Transcription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.text, self.confidence_label())
    }
}

impl BabelClient {
    /// Upload one audio file for transcription.
    ///
    /// Unsupported extensions fail locally without a request.
    pub async fn transcribe(&self, upload: AudioUpload) -> Result<Transcription> {
        let mime = audio_mime(&upload.file_name)?;
        if upload.is_empty() {
            return Err(ApiError::Integrity(format!("{} is empty", upload.file_name)));
        }

        debug!("Uploading {} ({} bytes)", upload.file_name, upload.len());
        let part = multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(mime)
            .map_err(HttpClientError::from)?;
        let form = multipart::Form::new().part(AUDIO_FIELD, part);

        let response = self
            .http()
            .post(self.config().api_url(TRANSCRIBE_PATH))
            .multipart(form)
            .send()
            .await?;

        if !response.is_success() {
            return Err(ApiError::status(response.status()));
        }

        let body = json_body(&response)?;
        let text = body.get("text").and_then(Value::as_str);
        let confidence = body.get("confidence").and_then(Value::as_f64);
        match (text, confidence) {
            (Some(text), Some(confidence)) => Ok(Transcription {
                text: text.to_string(),
                confidence,
            }),
            _ => Err(ApiError::UnexpectedResponse(
                "expected text and confidence".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_is_case_insensitive() {
        assert!(AudioUpload::new("clip.MP3", vec![1]).validate().is_ok());
        assert!(AudioUpload::new("voice.note.Ogg", vec![1]).validate().is_ok());
        assert_eq!(AudioUpload::new("a.WaV", vec![1]).extension(), "wav");
    }

    #[test]
    fn test_unsupported_extensions() {
        for name in ["clip.flac", "clip", "clip.mp4", "mp3"] {
            let err = AudioUpload::new(name, vec![1]).validate().unwrap_err();
            assert!(matches!(err, ApiError::UnsupportedAudio(_)), "{name}");
        }
    }

    #[test]
    fn test_confidence_label() {
        let t = Transcription {
            text: "hello".to_string(),
            confidence: 0.9312,
        };
        assert_eq!(t.confidence_label(), "Confidence: 93.12%");
        assert_eq!(t.to_string(), "hello\nConfidence: 93.12%");
    }

    #[tokio::test]
    async fn test_from_path_rejects_before_reading() {
        // The file does not exist; the extension check must fire first
        let err = AudioUpload::from_path("/nonexistent/clip.flac").await.unwrap_err();
        assert!(matches!(err, ApiError::UnsupportedAudio(ext) if ext == "flac"));

        let err = AudioUpload::from_path("/nonexistent/clip.mp3").await.unwrap_err();
        assert!(matches!(err, ApiError::Io(_)));
    }
}
