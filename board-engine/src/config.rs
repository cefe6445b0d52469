/// Default depth of the session command queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Board session configuration
///
/// # Environment
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | BOARD_QUEUE_CAPACITY | 64 | Pending operations a session buffers before callers wait |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub queue_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl SessionConfig {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            queue_capacity: parse_capacity(std::env::var("BOARD_QUEUE_CAPACITY").ok()),
        }
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }
}

fn parse_capacity(raw: Option<String>) -> usize {
    raw.and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_QUEUE_CAPACITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_capacity() {
        assert_eq!(parse_capacity(None), DEFAULT_QUEUE_CAPACITY);
        assert_eq!(parse_capacity(Some("16".into())), 16);
        assert_eq!(parse_capacity(Some(" 8 ".into())), 8);
        assert_eq!(parse_capacity(Some("0".into())), DEFAULT_QUEUE_CAPACITY);
        assert_eq!(parse_capacity(Some("many".into())), DEFAULT_QUEUE_CAPACITY);
    }

    #[test]
    fn test_with_queue_capacity_never_zero() {
        assert_eq!(SessionConfig::default().with_queue_capacity(0).queue_capacity, 1);
    }
}
