//! Plain-text rendering of the view: banner, form, list.

use std::fmt::Write;

use student_core::{Field, Student, StudentView};

pub fn render_view(view: &StudentView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Student Registration");
    if let Some(message) = view.error_message() {
        let _ = writeln!(out, "! {message}");
    }
    let _ = writeln!(out);

    let draft = view.draft();
    for field in Field::ALL {
        let _ = writeln!(out, "  {:<7} {}", format!("{field}:"), draft.get(field));
    }
    let _ = writeln!(out, "  [{}]", view.mode().submit_label());
    let _ = writeln!(out);

    let _ = writeln!(out, "Student List");
    out.push_str(&render_list(view.students()));
    out
}

/// One line per student, in the order given.
pub fn render_list(students: &[Student]) -> String {
    if students.is_empty() {
        return "  (no students)\n".to_string();
    }
    let mut out = String::new();
    for s in students {
        let _ = writeln!(out, "  #{:<4} {}  <{}>  {}", s.id, s.name, s.email, s.course);
    }
    out
}
