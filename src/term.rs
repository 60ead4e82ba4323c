/// Terminal line session: turns a raw keystroke stream into discrete
/// line-based command submissions and accumulates rendered output.
///
/// Pure state — no I/O. The panel feeds keystrokes in; when a line terminator
/// arrives, `submit` hands the whole buffered line back exactly once and the
/// buffer is cleared before the next keystroke is processed. Echo is local:
/// the live prompt line renders straight from the buffer, the command
/// executor is never consulted for it.
///
/// There is no in-flight guard: a manually entered command can race a
/// programmatically injected one (the Run action) and their output may
/// interleave in the log.
// TODO: add a busy flag that queues or rejects a submission while another
// command is executing.

const PROMPT: &str = "$ ";
const WELCOME: &str = "Welcome to the Slate terminal";

pub struct TerminalSession {
    /// Completed output lines, oldest first.
    log: Vec<String>,
    /// The line being typed. Never contains a line terminator.
    buffer: String,
}

impl Default for TerminalSession {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalSession {
    pub fn new() -> Self {
        Self {
            log: vec![WELCOME.to_string()],
            buffer: String::new(),
        }
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// The live input line as rendered at the bottom of the panel.
    pub fn prompt_line(&self) -> String {
        format!("{PROMPT}{}", self.buffer)
    }

    /// Append a printable character to the buffer (local echo happens at
    /// render time). Line terminators are routed through `submit` and are
    /// never buffered.
    pub fn push_char(&mut self, c: char) {
        if c == '\n' || c == '\r' {
            return;
        }
        self.buffer.push(c);
    }

    /// Remove the last buffered character. No-op on an empty buffer.
    /// Returns whether a character was erased.
    pub fn backspace(&mut self) -> bool {
        self.buffer.pop().is_some()
    }

    /// Line terminator: move the echoed line into the log, clear the buffer,
    /// and return the trimmed command if there is one to run.
    pub fn submit(&mut self) -> Option<String> {
        let raw = std::mem::take(&mut self.buffer);
        self.log.push(format!("{PROMPT}{raw}"));
        let command = raw.trim();
        if command.is_empty() {
            None
        } else {
            Some(command.to_string())
        }
    }

    /// Echo a programmatically injected command (the Run action) as if the
    /// user had typed and submitted it. The caller dispatches it separately,
    /// exactly once.
    pub fn inject(&mut self, command: &str) {
        self.log.push(format!("{PROMPT}{command}"));
    }

    /// Append process output, normalizing line endings for the log.
    pub fn append_output(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let mut chunk = text;
        if let Some(stripped) = chunk.strip_suffix('\n') {
            chunk = stripped;
        }
        for line in chunk.split('\n') {
            self.log.push(line.trim_end_matches('\r').to_string());
        }
    }

    /// Append a single error line (command failure or transport failure).
    pub fn append_line(&mut self, line: &str) {
        self.log.push(line.to_string());
    }

    /// Drop all output. The prompt line is live state, so it survives.
    pub fn clear(&mut self) {
        self.log.clear();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(term: &mut TerminalSession, s: &str) {
        for c in s.chars() {
            term.push_char(c);
        }
    }

    #[test]
    fn typed_line_dispatches_exactly_once() {
        let mut term = TerminalSession::new();
        type_str(&mut term, "echo hi");
        assert_eq!(term.buffer(), "echo hi");

        let cmd = term.submit();
        assert_eq!(cmd.as_deref(), Some("echo hi"));
        assert_eq!(term.buffer(), "");

        // The echoed line landed in the log.
        assert_eq!(term.log().last().map(String::as_str), Some("$ echo hi"));
    }

    #[test]
    fn blank_line_is_not_dispatched() {
        let mut term = TerminalSession::new();
        type_str(&mut term, "   ");
        assert_eq!(term.submit(), None);
        assert_eq!(term.buffer(), "");
    }

    #[test]
    fn submitted_command_is_trimmed() {
        let mut term = TerminalSession::new();
        type_str(&mut term, "  ls -la  ");
        assert_eq!(term.submit().as_deref(), Some("ls -la"));
    }

    #[test]
    fn backspace_on_empty_buffer_is_noop() {
        let mut term = TerminalSession::new();
        assert!(!term.backspace());
        assert_eq!(term.buffer(), "");

        type_str(&mut term, "ab");
        assert!(term.backspace());
        assert_eq!(term.buffer(), "a");
    }

    #[test]
    fn buffer_never_holds_a_line_terminator() {
        let mut term = TerminalSession::new();
        term.push_char('a');
        term.push_char('\n');
        term.push_char('\r');
        term.push_char('b');
        assert_eq!(term.buffer(), "ab");
    }

    #[test]
    fn output_is_newline_normalized() {
        let mut term = TerminalSession::new();
        term.clear();
        term.append_output("one\r\ntwo\nthree\n");
        assert_eq!(term.log(), ["one", "two", "three"]);

        term.append_output("no trailing newline");
        assert_eq!(term.log().last().map(String::as_str), Some("no trailing newline"));
    }

    #[test]
    fn inject_echoes_with_prompt() {
        let mut term = TerminalSession::new();
        term.inject("python \"a.py\"");
        assert_eq!(
            term.log().last().map(String::as_str),
            Some("$ python \"a.py\"")
        );
        // Injection does not disturb a half-typed manual line.
        term.push_char('x');
        assert_eq!(term.buffer(), "x");
    }
}
