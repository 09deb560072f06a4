//! PDF document generation by template filling.
//!
//! Each document is a bundled form template: an ordered list of
//! `(field key, French label)` pairs under a title. [`PdfFiller`] is the
//! seam; the shipped [`FormTemplateFiller`] substitutes the supplied
//! values into the template's fields and renders a single-page PDF
//! (Helvetica, WinAnsi encoding, so French accents survive). Absent
//! values fall back to `"Inconnue"`, matching the historical documents.

use buildup_core::error::CoreError;

/// Default shown for a field the caller could not supply.
pub const MISSING_ANSWER: &str = "Inconnue";

/// Wrap width in characters for field values.
const LINE_WIDTH: usize = 90;

/// Lines that fit on the single A4 page below the title.
const MAX_PAGE_LINES: usize = 42;

/// The bundled document templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentTemplate {
    /// Integration fiche countersigned by a builder entering the program.
    FicheIntegrationBuilder,
    /// Integration fiche countersigned by a coach entering the program.
    FicheIntegrationCoach,
    /// Membership card for an active builder.
    BuilderCard,
    /// Membership card for an active coach.
    CoachCard,
    /// Parental attestation for underage participants.
    AttestationMineure,
}

impl DocumentTemplate {
    /// Document title printed at the top of the page.
    pub fn title(&self) -> &'static str {
        match self {
            DocumentTemplate::FicheIntegrationBuilder => "Fiche d'intégration Builder",
            DocumentTemplate::FicheIntegrationCoach => "Fiche d'intégration Coach",
            DocumentTemplate::BuilderCard => "Carte Builder",
            DocumentTemplate::CoachCard => "Carte Coach",
            DocumentTemplate::AttestationMineure => "Attestation parentale pour les mineurs",
        }
    }

    /// The template's form fields as ordered `(key, label)` pairs.
    pub fn fields(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            DocumentTemplate::FicheIntegrationBuilder => &[
                ("first_name", "Prénom"),
                ("last_name", "Nom"),
                ("birthdate", "Date de naissance"),
                ("email", "Email"),
                ("phone", "Téléphone"),
                ("discord", "Discord"),
                ("address", "Adresse"),
                ("school", "École"),
                ("situation", "Situation"),
                ("project_name", "Nom du projet"),
                ("project_domains", "Domaines du projet"),
                ("project_launch_date", "Date de lancement"),
                ("project_description", "Description du projet"),
                ("project_team", "Équipe"),
                ("expectations", "Attentes du programme"),
                ("objectives", "Objectifs à 3 mois"),
                ("sign_place", "Fait à"),
                ("sign_date", "Fait le"),
            ],
            DocumentTemplate::FicheIntegrationCoach => &[
                ("first_name", "Prénom"),
                ("last_name", "Nom"),
                ("birthdate", "Date de naissance"),
                ("email", "Email"),
                ("phone", "Téléphone"),
                ("discord", "Discord"),
                ("address", "Adresse"),
                ("situation", "Situation"),
                ("keywords", "Mots clés"),
                ("experiences", "Expériences"),
                ("ideal_builder", "Builder idéal"),
                ("objectives", "Objectifs pour le Builder"),
                ("sign_place", "Fait à"),
                ("sign_date", "Fait le"),
            ],
            DocumentTemplate::BuilderCard | DocumentTemplate::CoachCard => &[
                ("first_name", "Prénom"),
                ("last_name", "Nom"),
                ("birthdate", "Date de naissance"),
                ("validity_date", "Valable jusqu'au"),
            ],
            DocumentTemplate::AttestationMineure => &[
                ("name", "Nom complet"),
                ("address", "Adresse"),
                ("city", "Ville"),
                ("postal_code", "Code postal"),
                ("email", "Email"),
                ("phone", "Téléphone"),
                ("made_at", "Fait à"),
                ("made_date", "Fait le"),
            ],
        }
    }
}

/// Seam for PDF generation.
pub trait PdfFiller {
    /// Fill a template's fields with `(key, value)` pairs and return
    /// the document bytes.
    fn fill(
        &self,
        template: DocumentTemplate,
        values: &[(&'static str, String)],
    ) -> Result<Vec<u8>, CoreError>;
}

/// The shipped [`PdfFiller`]: renders the template's labelled fields
/// with the substituted values onto one page.
pub struct FormTemplateFiller;

impl PdfFiller for FormTemplateFiller {
    fn fill(
        &self,
        template: DocumentTemplate,
        values: &[(&'static str, String)],
    ) -> Result<Vec<u8>, CoreError> {
        let mut lines = Vec::new();
        for (key, label) in template.fields() {
            let value = values
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
                .unwrap_or(MISSING_ANSWER);
            lines.extend(field_lines(label, value));
        }
        Ok(render_document(template.title(), &lines))
    }
}

/// Break one `label : value` field into page lines, wrapping long
/// values with a hanging indent.
fn field_lines(label: &str, value: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = format!("{label} : ");
    for word in value.split_whitespace() {
        if current.chars().count() + word.chars().count() > LINE_WIDTH {
            lines.push(current.trim_end().to_string());
            current = "      ".to_string();
        }
        current.push_str(word);
        current.push(' ');
    }
    lines.push(current.trim_end().to_string());
    lines
}

/// Write a minimal single-page PDF: a title line followed by the field
/// lines, Helvetica with WinAnsi encoding.
fn render_document(title: &str, lines: &[String]) -> Vec<u8> {
    let mut content = Vec::new();
    content.extend_from_slice(b"BT\n/F1 16 Tf\n50 780 Td\n");
    append_text(&mut content, title);
    content.extend_from_slice(b" Tj\n/F1 11 Tf\n");
    for line in lines.iter().take(MAX_PAGE_LINES) {
        content.extend_from_slice(b"0 -16 Td\n");
        append_text(&mut content, line);
        content.extend_from_slice(b" Tj\n");
    }
    content.extend_from_slice(b"ET\n");

    let mut out = Vec::new();
    let mut offsets = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n");

    push_object(&mut out, &mut offsets, 1, "<< /Type /Catalog /Pages 2 0 R >>");
    push_object(
        &mut out,
        &mut offsets,
        2,
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>",
    );
    push_object(
        &mut out,
        &mut offsets,
        3,
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 595 842] \
         /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>",
    );

    offsets.push(out.len());
    out.extend_from_slice(format!("4 0 obj\n<< /Length {} >>\nstream\n", content.len()).as_bytes());
    out.extend_from_slice(&content);
    out.extend_from_slice(b"endstream\nendobj\n");

    push_object(
        &mut out,
        &mut offsets,
        5,
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
    );

    let xref_offset = out.len();
    out.extend_from_slice(b"xref\n0 6\n0000000000 65535 f \n");
    for offset in &offsets {
        out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!("trailer\n<< /Size 6 /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n").as_bytes(),
    );
    out
}

fn push_object(out: &mut Vec<u8>, offsets: &mut Vec<usize>, number: u32, body: &str) {
    offsets.push(out.len());
    out.extend_from_slice(format!("{number} 0 obj\n{body}\nendobj\n").as_bytes());
}

/// Append a PDF string literal. Parentheses and backslashes are
/// escaped; characters outside WinAnsi's single-byte range degrade to
/// `?`.
fn append_text(out: &mut Vec<u8>, text: &str) {
    out.push(b'(');
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push(b'\\');
                out.push(ch as u8);
            }
            c if (c as u32) < 256 => out.push(c as u8),
            _ => out.push(b'?'),
        }
    }
    out.push(b')');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_filled_document_is_a_pdf() {
        let bytes = FormTemplateFiller
            .fill(
                DocumentTemplate::BuilderCard,
                &[
                    ("first_name", "Anael".to_string()),
                    ("last_name", "MEGRET".to_string()),
                    ("birthdate", "30/04/2001".to_string()),
                    ("validity_date", "01/07/2021".to_string()),
                ],
            )
            .unwrap();

        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(contains(&bytes, b"%%EOF"));
        assert!(contains(&bytes, b"MEGRET"));
        assert!(contains(&bytes, b"01/07/2021"));
    }

    #[test]
    fn test_missing_field_defaults_to_inconnue() {
        let bytes = FormTemplateFiller
            .fill(
                DocumentTemplate::FicheIntegrationCoach,
                &[("first_name", "Lucie".to_string())],
            )
            .unwrap();

        assert!(contains(&bytes, b"Lucie"));
        assert!(contains(&bytes, b"Inconnue"));
    }

    #[test]
    fn test_parentheses_are_escaped() {
        let bytes = FormTemplateFiller
            .fill(
                DocumentTemplate::AttestationMineure,
                &[("city", "Rennes (35)".to_string())],
            )
            .unwrap();

        assert!(contains(&bytes, b"Rennes \\(35\\)"));
    }

    #[test]
    fn test_long_values_wrap() {
        let description = "mot ".repeat(60);
        let lines = field_lines("Description du projet", description.trim_end());

        assert!(lines.len() > 1, "long value should span several lines");
        assert!(lines[0].starts_with("Description du projet : "));
        assert!(lines[1].starts_with("      "));
        assert!(lines.iter().all(|l| l.chars().count() <= LINE_WIDTH + 4));
    }

    #[test]
    fn test_every_template_renders() {
        let templates = [
            DocumentTemplate::FicheIntegrationBuilder,
            DocumentTemplate::FicheIntegrationCoach,
            DocumentTemplate::BuilderCard,
            DocumentTemplate::CoachCard,
            DocumentTemplate::AttestationMineure,
        ];
        for template in templates {
            let bytes = FormTemplateFiller.fill(template, &[]).unwrap();
            assert!(bytes.starts_with(b"%PDF-1.4"), "{template:?}");
        }
    }
}
