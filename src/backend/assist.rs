/// The assistant panel's canned responder.
///
/// No model behind it — keyword matching over the query, with the active
/// file's content available as context for the "explain" branch.
pub fn respond(query: &str, context: &str, path: &str) -> String {
    let q = query.to_lowercase();

    if q.contains("fix") {
        return "I can help you fix bugs! (Not really, I'm a mock, but I believe in you!)."
            .to_string();
    }
    if q.contains("explain") {
        return if context.is_empty() {
            "I don't see any file content to explain.".to_string()
        } else {
            let lines = context.lines().count();
            format!("This file '{path}' has {lines} lines of code. It looks like a masterpiece!")
        };
    }
    if q.contains("hello") {
        return "Hello there! Ready to build something crazy?".to_string();
    }
    if q.contains("joke") {
        return "Why do programmers prefer dark mode? Because light attracts bugs.".to_string();
    }

    format!("I'm just a simple mock AI for now, but I see you're asking about: {query}")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explain_counts_lines_of_context() {
        let reply = respond("explain this", "a\nb\nc", "x.py");
        assert!(reply.contains("3 lines"));
        assert!(reply.contains("x.py"));
    }

    #[test]
    fn explain_without_context() {
        let reply = respond("explain", "", "x.py");
        assert!(reply.contains("don't see any file content"));
    }

    #[test]
    fn unknown_query_echoes_back() {
        let reply = respond("what is love", "", "");
        assert!(reply.contains("what is love"));
    }
}
