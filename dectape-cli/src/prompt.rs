//! Yes/no questions on the terminal

use std::io::{self, BufRead, Write};

/// Ask `message` until the answer starts with `y` or `n`.
///
/// End of input counts as no.
pub fn query_yes_no<R: BufRead, W: Write>(input: &mut R, output: &mut W, message: &str) -> bool {
    let mut line = String::new();
    loop {
        let _ = write!(output, "{message} (y/n)?");
        let _ = output.flush();

        line.clear();
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => return false,
            Ok(_) => {}
        }

        match line.trim().chars().next() {
            Some('y' | 'Y') => return true,
            Some('n' | 'N') => return false,
            _ => {
                let _ = writeln!(output, "Please respond with 'Y' or 'N'");
            }
        }
    }
}

/// [`query_yes_no`] on stdin, prompting on stderr
pub fn confirm_on_terminal(message: &str) -> bool {
    query_yes_no(&mut io::stdin().lock(), &mut io::stderr(), message)
}
