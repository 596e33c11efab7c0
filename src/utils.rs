use std::time::Duration;

/// Join a root key path and a child key with `.`; an empty root yields the key itself.
pub fn join_key(root: &str, key: &str) -> String {
    if root.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", root, key)
    }
}

pub fn format_elapsed(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs();
    if seconds < 60 {
        format!("{} sec{}", seconds, if seconds != 1 { "s" } else { "" })
    } else if seconds < 3600 {
        let minutes = seconds / 60;
        let secs = seconds % 60;
        format!("{} min{}, {} sec{}",
            minutes, if minutes != 1 { "s" } else { "" },
            secs, if secs != 1 { "s" } else { "" }
        )
    } else {
        let hours = seconds / 3600;
        let minutes = (seconds % 3600) / 60;
        format!("{} hr{}, {} min{}",
            hours, if hours != 1 { "s" } else { "" },
            minutes, if minutes != 1 { "s" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_key() {
        assert_eq!(join_key("p.board.juno", "name"), "p.board.juno.name");
        assert_eq!(join_key("", "arm"), "arm");
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_secs(1)), "1 sec");
        assert_eq!(format_elapsed(Duration::from_millis(45_900)), "45 secs");
        assert_eq!(format_elapsed(Duration::from_secs(61)), "1 min, 1 sec");
        assert_eq!(format_elapsed(Duration::from_secs(7_320)), "2 hrs, 2 mins");
    }
}
