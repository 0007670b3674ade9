//! Degraded-mode shell strategy: literal substring splicing. Opens the
//! shell right before the login container's opening tag and closes it
//! just before `</body>`, with no understanding of the markup between.
//! Only runs when the structural strategy is unavailable or bowed out.

use super::{append_class, ShellSpec, ShellStrategy};

pub(super) struct SpliceShell;

impl ShellStrategy for SpliceShell {
    fn apply(&self, html: &str, shell: &ShellSpec) -> Option<String> {
        let id_pos = html
            .find("id=\"login\"")
            .or_else(|| html.find("id='login'"))?;
        let tag_start = html[..id_pos].rfind('<')?;
        let tag_end = tag_start + html[tag_start..].find('>')? + 1;
        let open_tag = append_class(&html[tag_start..tag_end], "lp-form");

        let mut out = String::with_capacity(html.len() + 256);
        out.push_str(&html[..tag_start]);
        out.push_str(&shell.open_markup());
        out.push_str(&open_tag);

        let rest = &html[tag_end..];
        match rfind_ci(rest, "</body>") {
            Some(i) => {
                out.push_str(&rest[..i]);
                out.push_str(shell.close_markup());
                out.push_str(&rest[i..]);
            }
            None => {
                out.push_str(rest);
                out.push_str(shell.close_markup());
            }
        }
        Some(out)
    }
}

fn rfind_ci(haystack: &str, needle: &str) -> Option<usize> {
    haystack.to_ascii_lowercase().rfind(needle)
}
