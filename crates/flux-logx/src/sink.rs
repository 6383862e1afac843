use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// 日志输出目标
///
/// 每条记录在锁内以一次 `write_all` 写出完整一行，多线程并发写不会交错。
#[derive(Clone)]
pub struct Sink {
    kind: SinkKind,
}

#[derive(Clone)]
enum SinkKind {
    Stdout,
    Stderr,
    Writer(Arc<Mutex<Box<dyn Write + Send>>>),
}

impl Sink {
    pub fn stdout() -> Self {
        Self {
            kind: SinkKind::Stdout,
        }
    }

    pub fn stderr() -> Self {
        Self {
            kind: SinkKind::Stderr,
        }
    }

    /// 包装任意 `Write`
    pub fn new<W>(writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            kind: SinkKind::Writer(Arc::new(Mutex::new(Box::new(writer)))),
        }
    }

    /// 以追加方式打开文件，不存在时创建
    pub fn file(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Ok(Self::new(file))
    }

    pub fn is_stdout(&self) -> bool {
        matches!(self.kind, SinkKind::Stdout)
    }

    pub fn is_stderr(&self) -> bool {
        matches!(self.kind, SinkKind::Stderr)
    }

    /// 写出一行完整记录
    pub fn write_line(&self, line: &[u8]) -> io::Result<()> {
        match &self.kind {
            SinkKind::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(line)?;
                out.flush()
            }
            SinkKind::Stderr => {
                let mut out = io::stderr().lock();
                out.write_all(line)?;
                out.flush()
            }
            SinkKind::Writer(writer) => {
                let mut writer = lock(writer);
                writer.write_all(line)?;
                writer.flush()
            }
        }
    }
}

impl Default for Sink {
    fn default() -> Self {
        Self::stdout()
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            SinkKind::Stdout => "stdout",
            SinkKind::Stderr => "stderr",
            SinkKind::Writer(_) => "writer",
        };
        f.debug_struct("Sink").field("kind", &kind).finish()
    }
}

// 写入方 panic 不影响后续日志
fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// 内存缓冲区，克隆共享同一份数据
#[derive(Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以该缓冲区为目标的 `Sink`
    pub fn sink(&self) -> Sink {
        Sink::new(self.clone())
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&lock(&self.inner)).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.inner).is_empty()
    }

    pub fn clear(&self) {
        lock(&self.inner).clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        lock(&self.inner).extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Debug for SharedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedBuffer")
            .field("len", &lock(&self.inner).len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_is_stdout() {
        assert!(Sink::default().is_stdout());
        assert!(Sink::stderr().is_stderr());
        assert!(!SharedBuffer::new().sink().is_stdout());
    }

    #[test]
    fn test_shared_buffer_sink() {
        let buffer = SharedBuffer::new();
        let sink = buffer.sink();

        sink.write_line(b"{\"a\":1}\n").unwrap();
        sink.write_line(b"{\"b\":2}\n").unwrap();

        assert_eq!(buffer.lines(), vec!["{\"a\":1}", "{\"b\":2}"]);

        buffer.clear();
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_file_sink_appends() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "existing\n").unwrap();

        let sink = Sink::file(temp_file.path()).unwrap();
        sink.write_line(b"appended\n").unwrap();

        let mut content = String::new();
        std::fs::File::open(temp_file.path())
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "existing\nappended\n");
    }

    #[test]
    fn test_file_sink_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("app.log");
        assert!(Sink::file(path).is_err());
    }
}
