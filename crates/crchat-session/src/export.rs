use chrono::{DateTime, Local};
use crchat_types::{ChatTurn, EndpointConfig};

use crate::StoreError;

const RULE: &str = "==================================================";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Destination for an exported transcript
pub trait FileSink {
    /// Save `contents` under `filename`, returning where it ended up
    fn save(&self, filename: &str, contents: &str) -> Result<String, StoreError>;
}

/// `crchat-conversation-YYYY-MM-DD-HHMM.txt`
pub fn transcript_filename(saved_at: DateTime<Local>) -> String {
    format!("crchat-conversation-{}.txt", saved_at.format("%Y-%m-%d-%H%M"))
}

pub fn build_transcript(config: &EndpointConfig, turns: &[ChatTurn], saved_at: DateTime<Local>) -> String {
    let mut out = String::new();
    out.push_str("CR Chatbot Conversation\n");
    out.push_str(&format!("Saved: {}\n", saved_at.format(TIMESTAMP_FORMAT)));
    out.push_str(&format!("Model: {}\n", config.model_name));
    out.push_str(&format!("Endpoint: {}\n", config.base_url));
    out.push_str(&format!("System Prompt: {}\n\n", config.system_prompt));
    out.push_str(RULE);
    out.push_str("\n\n");

    for (i, turn) in turns.iter().enumerate() {
        out.push_str(&format!(
            "[{}] {} ({}):\n{}\n\n",
            i + 1,
            turn.role().transcript_label(),
            turn.created_at().format(TIMESTAMP_FORMAT),
            turn.content()
        ));
    }

    out.push('\n');
    out.push_str(RULE);
    out.push_str(&format!("\nEnd of conversation - {} messages total\n", turns.len()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crchat_types::Role;
    use pretty_assertions::assert_eq;

    fn at(h: u32, m: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, h, m, 5).single().unwrap()
    }

    #[test]
    fn test_filename() {
        assert_eq!(transcript_filename(at(7, 4)), "crchat-conversation-2024-03-09-0704.txt");
    }

    #[test]
    fn test_transcript_layout() {
        let config = EndpointConfig::default();
        let turns = vec![
            ChatTurn::with_timestamp(Role::User, "hi", at(9, 0)),
            ChatTurn::with_timestamp(Role::Assistant, "<think>hm</think>hello", at(9, 1)),
        ];
        let text = build_transcript(&config, &turns, at(9, 2));
        let expected = format!(
            "CR Chatbot Conversation\n\
             Saved: 2024-03-09 09:02:05\n\
             Model: llama3.2\n\
             Endpoint: http://localhost:11434\n\
             System Prompt: {}\n\
             \n\
             {RULE}\n\
             \n\
             [1] User (2024-03-09 09:00:05):\n\
             hi\n\
             \n\
             [2] Assistant (2024-03-09 09:01:05):\n\
             <think>hm</think>hello\n\
             \n\
             \n\
             {RULE}\n\
             End of conversation - 2 messages total\n",
            config.system_prompt
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_system_role_is_labelled_assistant() {
        let turns = vec![ChatTurn::with_timestamp(Role::System, "x", at(1, 0))];
        let text = build_transcript(&EndpointConfig::default(), &turns, at(1, 0));
        assert!(text.contains("[1] Assistant (2024-03-09 01:00:05):\nx\n"));
    }
}
