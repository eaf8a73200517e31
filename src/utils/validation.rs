//! Centralized input validation.
//!
//! Alignment cost grows superlinearly with input length and has no natural
//! early exit, so the CLI and the web service cap input here before any
//! comparison runs.

/// Maximum transcription length in characters
pub const MAX_TRANSCRIPTION_CHARS: usize = 20_000;

/// Maximum accepted audio upload size (25 MB)
pub const MAX_AUDIO_SIZE: usize = 25 * 1024 * 1024;

/// Highest chapter number in the Quran
pub const MAX_CHAPTER: u32 = 114;

/// Security-related constants for input validation
pub const MAX_FILENAME_LENGTH: usize = 255;

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Transcription is empty")]
    EmptyTranscription,
    #[error("Transcription too long: {0} characters exceeds maximum of {MAX_TRANSCRIPTION_CHARS}")]
    TranscriptionTooLong(usize),
    #[error("Invalid chapter number '{0}': expected an integer between 1 and {MAX_CHAPTER}")]
    InvalidChapter(String),
    #[error("Invalid verse number '{0}': expected a positive integer")]
    InvalidVerse(String),
    #[error("Audio upload is empty")]
    EmptyAudio,
    #[error("Audio upload too large: {0} bytes exceeds maximum of {MAX_AUDIO_SIZE}")]
    AudioTooLarge(usize),
    #[error("Unrecognized audio format")]
    UnknownAudioFormat,
    #[error("Filename too long: exceeds {MAX_FILENAME_LENGTH} characters")]
    FilenameTooLong,
    #[error("Invalid filename: contains path traversal or invalid characters")]
    InvalidFilename,
    #[error("Empty filename provided")]
    EmptyFilename,
}

/// Check a transcription before it is aligned.
///
/// Failure sentinels pass through; they are short and never aligned.
///
/// # Errors
///
/// Returns `ValidationError::EmptyTranscription` for blank input or
/// `ValidationError::TranscriptionTooLong` above the cap.
pub fn validate_transcription(text: &str) -> Result<&str, ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyTranscription);
    }
    let chars = text.chars().count();
    if chars > MAX_TRANSCRIPTION_CHARS {
        return Err(ValidationError::TranscriptionTooLong(chars));
    }
    Ok(text)
}

/// Parse a chapter number from user input.
///
/// # Examples
///
/// ```
/// use recital_check::utils::validation::parse_chapter;
///
/// assert_eq!(parse_chapter(" 112 ").unwrap(), 112);
/// assert!(parse_chapter("0").is_err());
/// assert!(parse_chapter("115").is_err());
/// assert!(parse_chapter("al-ikhlas").is_err());
/// ```
///
/// # Errors
///
/// Returns `ValidationError::InvalidChapter` unless the input is an integer
/// in `1..=114`.
pub fn parse_chapter(input: &str) -> Result<u32, ValidationError> {
    input
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|n| (1..=MAX_CHAPTER).contains(n))
        .ok_or_else(|| ValidationError::InvalidChapter(input.to_string()))
}

/// Parse a verse number from user input.
///
/// # Errors
///
/// Returns `ValidationError::InvalidVerse` unless the input is a positive
/// integer.
pub fn parse_verse(input: &str) -> Result<u32, ValidationError> {
    input
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| ValidationError::InvalidVerse(input.to_string()))
}

/// Check a chapter number that is already an integer.
///
/// # Errors
///
/// Returns `ValidationError::InvalidChapter` outside `1..=114`.
pub fn validate_chapter(chapter: u32) -> Result<u32, ValidationError> {
    if (1..=MAX_CHAPTER).contains(&chapter) {
        Ok(chapter)
    } else {
        Err(ValidationError::InvalidChapter(chapter.to_string()))
    }
}

/// Audio container recognized from its leading bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
    Ogg,
    Flac,
    M4a,
    Webm,
}

impl AudioFormat {
    /// Sniff the format from magic numbers
    #[must_use]
    pub fn detect(content: &[u8]) -> Option<Self> {
        if content.len() >= 12 && content.starts_with(b"RIFF") && &content[8..12] == b"WAVE" {
            return Some(Self::Wav);
        }
        // ID3 tag, or a bare MPEG frame sync
        if content.starts_with(b"ID3")
            || (content.len() >= 2 && content[0] == 0xFF && content[1] & 0xE0 == 0xE0)
        {
            return Some(Self::Mp3);
        }
        if content.starts_with(b"OggS") {
            return Some(Self::Ogg);
        }
        if content.starts_with(b"fLaC") {
            return Some(Self::Flac);
        }
        if content.len() >= 8 && &content[4..8] == b"ftyp" {
            return Some(Self::M4a);
        }
        if content.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
            return Some(Self::Webm);
        }
        None
    }

    #[must_use]
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mpeg",
            Self::Ogg => "audio/ogg",
            Self::Flac => "audio/flac",
            Self::M4a => "audio/mp4",
            Self::Webm => "audio/webm",
        }
    }
}

/// Check an audio upload and detect its format.
///
/// # Errors
///
/// Returns an error for empty, oversized or unrecognized uploads.
pub fn validate_audio(content: &[u8]) -> Result<AudioFormat, ValidationError> {
    if content.is_empty() {
        return Err(ValidationError::EmptyAudio);
    }
    if content.len() > MAX_AUDIO_SIZE {
        return Err(ValidationError::AudioTooLarge(content.len()));
    }
    AudioFormat::detect(content).ok_or(ValidationError::UnknownAudioFormat)
}

/// Secure filename validation to prevent directory traversal and other attacks
///
/// # Errors
///
/// Returns `ValidationError::EmptyFilename` if the filename is empty,
/// `ValidationError::FilenameTooLong` if it exceeds the limit, or
/// `ValidationError::InvalidFilename` if it contains invalid characters.
pub fn validate_filename(filename: &str) -> Result<String, ValidationError> {
    if filename.trim().is_empty() {
        return Err(ValidationError::EmptyFilename);
    }

    if filename.len() > MAX_FILENAME_LENGTH {
        return Err(ValidationError::FilenameTooLong);
    }

    // Prevent directory traversal attacks
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return Err(ValidationError::InvalidFilename);
    }

    if filename.contains('\0') || filename.chars().any(|c| ('\x01'..='\x1F').contains(&c)) {
        return Err(ValidationError::InvalidFilename);
    }

    let sanitized = filename
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == '-' || *c == '_' || *c == ' ')
        .collect::<String>();

    if sanitized.trim().is_empty() || sanitized.starts_with('.') {
        return Err(ValidationError::InvalidFilename);
    }

    Ok(sanitized)
}
