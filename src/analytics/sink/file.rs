use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, trace};

use super::{LogSink, SinkError, SinkResult, StoredEvent, StreamDescription, token_for};

/// Sink writing JSON-lines files.
///
/// Layout: `<root>/<group>/<stream>.log`, one [`StoredEvent`] per line.
/// The sequence token of a stream is its line count. Counts are read from
/// disk once per stream and then kept in memory; the map's mutex also
/// serializes appends.
pub struct FileLogSink {
    root: PathBuf,
    counts: Mutex<HashMap<PathBuf, usize>>,
}

/// Filesystem-safe name for a group or stream
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches(|c| c == '_' || c == '.');
    if cleaned.is_empty() {
        "default".to_string()
    } else {
        cleaned.to_string()
    }
}

impl FileLogSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            counts: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn group_dir(&self, group: &str) -> PathBuf {
        self.root.join(sanitize(group))
    }

    fn stream_path(&self, group: &str, stream: &str) -> PathBuf {
        self.group_dir(group).join(format!("{}.log", sanitize(stream)))
    }

    async fn require_group(&self, group: &str) -> SinkResult<PathBuf> {
        let dir = self.group_dir(group);
        match fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => Ok(dir),
            Ok(_) => Err(SinkError::Storage(format!(
                "{} is not a directory",
                dir.display()
            ))),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(SinkError::GroupNotFound(group.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn count_events(path: &Path) -> SinkResult<Option<usize>> {
        match fs::read_to_string(path).await {
            Ok(content) => Ok(Some(
                content.lines().filter(|l| !l.trim().is_empty()).count(),
            )),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Line count of `path`, loading it into `counts` on first use
    async fn cached_count(
        counts: &mut HashMap<PathBuf, usize>,
        path: &Path,
    ) -> SinkResult<Option<usize>> {
        if let Some(count) = counts.get(path) {
            return Ok(Some(*count));
        }
        let count = Self::count_events(path).await?;
        if let Some(count) = count {
            trace!("Loaded {} events from {}", count, path.display());
            counts.insert(path.to_path_buf(), count);
        }
        Ok(count)
    }

    /// Stored events of a stream, oldest first
    pub async fn read_events(&self, group: &str, stream: &str) -> SinkResult<Vec<StoredEvent>> {
        let path = self.stream_path(group, stream);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SinkError::StreamNotFound(stream.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line)
                    .map_err(|e| SinkError::Storage(format!("{}: {}", path.display(), e)))
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl LogSink for FileLogSink {
    async fn ensure_group(&self, group: &str) -> SinkResult<()> {
        let dir = self.group_dir(group);
        fs::create_dir_all(&dir).await?;
        trace!("Log group directory ready: {}", dir.display());
        Ok(())
    }

    async fn create_stream(&self, group: &str, stream: &str) -> SinkResult<()> {
        self.require_group(group).await?;
        let path = self.stream_path(group, stream);
        let mut counts = self.counts.lock().await;

        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(_) => {
                debug!("Created log stream {}", path.display());
                counts.insert(path, 0);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(SinkError::AlreadyExists(stream.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn describe_stream(
        &self,
        group: &str,
        stream: &str,
    ) -> SinkResult<Option<StreamDescription>> {
        self.require_group(group).await?;
        let path = self.stream_path(group, stream);
        let mut counts = self.counts.lock().await;

        Ok(Self::cached_count(&mut counts, &path)
            .await?
            .map(|count| StreamDescription {
                name: stream.to_string(),
                upload_sequence_token: token_for(count),
                stored_events: count,
            }))
    }

    async fn put_event(
        &self,
        group: &str,
        stream: &str,
        message: &str,
        timestamp_ms: i64,
        sequence_token: Option<&str>,
    ) -> SinkResult<String> {
        self.require_group(group).await?;
        let path = self.stream_path(group, stream);

        let mut counts = self.counts.lock().await;

        let count = Self::cached_count(&mut counts, &path)
            .await?
            .ok_or_else(|| SinkError::StreamNotFound(stream.to_string()))?;

        let expected = token_for(count);
        if expected.as_deref() != sequence_token {
            return Err(SinkError::InvalidSequenceToken { expected });
        }

        let mut line = serde_json::to_string(&StoredEvent {
            timestamp: timestamp_ms,
            message: message.to_string(),
        })
        .map_err(|e| SinkError::Storage(e.to_string()))?;
        line.push('\n');

        let mut file = match fs::OpenOptions::new().append(true).open(&path).await {
            Ok(file) => file,
            Err(e) => {
                counts.remove(&path);
                return Err(e.into());
            }
        };
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        counts.insert(path, count + 1);
        Ok((count + 1).to_string())
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
