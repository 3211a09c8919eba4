//! Reparación determinista de la salida del LLM en un documento Mermaid
//! `mindmap` con una única raíz.
//!
//! El modelo no siempre respeta el formato pedido: envuelve el código en
//! bloques ```` ``` ````, añade comentarios antes del diagrama o deja nodos
//! sin indentar que Mermaid interpreta como raíces adicionales. Aquí se
//! corrige todo eso sólo con texto, sin volver a llamar al backend.
//!
//! Pasos:
//!   1. Normalizar saltos de línea (CRLF → LF), recortar espacios alrededor
//!      del texto y quitar las vallas de código.
//!   2. Anclar el documento en la palabra clave `mindmap` (o sintetizarla).
//!   3. Recorrer las líneas una vez, re-indentando bajo la raíz los nodos
//!      que aparecen después de ella con menos de 4 espacios.

use std::borrow::Cow;

/// Palabra clave que abre todo diagrama de mapa mental.
pub const DIAGRAM_KEYWORD: &str = "mindmap";
/// Sintaxis del nodo raíz (doble paréntesis).
pub const ROOT_MARKER: &str = "root((";

const FENCE_WITH_LANG: &str = "```mermaid";
const FENCE: &str = "```";
const COMMENT_MARKER: char = '#';
const CHILD_INDENT: &str = "    ";
const MIN_CHILD_INDENT: usize = CHILD_INDENT.len();

/// Estado del recorrido línea a línea.
#[derive(Debug, Clone, Copy, Default)]
struct ScanState {
    root_found: bool,
}

/// Convierte la respuesta cruda del modelo en un documento `mindmap`.
///
/// La línea 0 del resultado es siempre exactamente `mindmap`. Las marcas de
/// raíz repetidas no se eliminan; ver [`count_root_markers`].
pub fn repair_mindmap(raw: &str) -> String {
    let normalised = normalise_line_endings(raw);
    let unfenced = strip_code_fences(normalised.trim());
    let anchored = anchor_at_keyword(unfenced.trim());
    reparent_shallow_lines(&anchored)
}

/// Número de líneas con la sintaxis de nodo raíz.
pub fn count_root_markers(document: &str) -> usize {
    document
        .split('\n')
        .filter(|line| line.contains(ROOT_MARKER))
        .count()
}

fn normalise_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn strip_code_fences(text: &str) -> String {
    text.replace(FENCE_WITH_LANG, "").replace(FENCE, "")
}

/// Descarta todo lo anterior a la palabra clave y deja ésta sola en la
/// primera línea. Se prefiere una línea que sea exactamente `mindmap`; si
/// no la hay, vale la primera aparición en cualquier parte del texto.
fn anchor_at_keyword(text: &str) -> String {
    let Some(start) = keyword_line_offset(text).or_else(|| text.find(DIAGRAM_KEYWORD)) else {
        return format!("{DIAGRAM_KEYWORD}\n{text}");
    };

    let tail = &text[start + DIAGRAM_KEYWORD.len()..];
    let (same_line, rest) = match tail.split_once('\n') {
        Some((line, rest)) => (line, Some(rest)),
        None => (tail, None),
    };

    let mut anchored = String::with_capacity(text.len() - start + 1);
    anchored.push_str(DIAGRAM_KEYWORD);

    // Contenido pegado a la palabra clave ("mindmap root((X))") pasa a su propia línea.
    let same_line = same_line.trim();
    if !same_line.is_empty() {
        anchored.push('\n');
        anchored.push_str(same_line);
    }
    if let Some(rest) = rest {
        anchored.push('\n');
        anchored.push_str(rest);
    }
    anchored
}

fn keyword_line_offset(text: &str) -> Option<usize> {
    let mut offset = 0;
    for line in text.split('\n') {
        if line.trim() == DIAGRAM_KEYWORD {
            if let Some(column) = line.find(DIAGRAM_KEYWORD) {
                return Some(offset + column);
            }
        }
        offset += line.len() + 1;
    }
    None
}

fn reparent_shallow_lines(document: &str) -> String {
    document
        .split('\n')
        .scan(ScanState::default(), |state, line| {
            let (next, repaired) = repair_line(*state, line);
            *state = next;
            Some(repaired)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn repair_line(state: ScanState, line: &str) -> (ScanState, Cow<'_, str>) {
    if line.trim() == DIAGRAM_KEYWORD {
        return (state, Cow::Borrowed(line));
    }
    if line.contains(ROOT_MARKER) {
        return (ScanState { root_found: true }, Cow::Borrowed(line));
    }

    let content = line.trim_start();
    let is_node = !content.is_empty() && !content.starts_with(COMMENT_MARKER);
    if state.root_found && is_node && indent_width(line) < MIN_CHILD_INDENT {
        return (state, Cow::Owned(format!("{CHILD_INDENT}{content}")));
    }
    (state, Cow::Borrowed(line))
}

/// Caracteres de espacio iniciales; un tabulador cuenta como uno.
fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_non_empty_line(doc: &str) -> &str {
        doc.split('\n').find(|l| !l.trim().is_empty()).unwrap_or("")
    }

    #[test]
    fn well_formed_document_is_unchanged() {
        let doc = "mindmap\n  root((🌱 Fotosíntesis))\n    🔬 [Proceso]\n      ☀️ (Luz solar)\n    ✨ [Productos]";
        assert_eq!(repair_mindmap(doc), doc);
        assert_eq!(repair_mindmap(&repair_mindmap(doc)), doc);
    }

    #[test]
    fn strips_code_fences() {
        let repaired = repair_mindmap("```mermaid\nmindmap\n  root((X))\n```");
        assert!(!repaired.contains("```"), "got: {repaired}");
        assert_eq!(repaired, "mindmap\n  root((X))");
    }

    #[test]
    fn strips_bare_fences() {
        let repaired = repair_mindmap("```\nmindmap\n  root((X))\n    A\n```");
        assert_eq!(repaired, "mindmap\n  root((X))\n    A");
    }

    #[test]
    fn drops_preamble_before_keyword() {
        let repaired = repair_mindmap("Here is your diagram:\nmindmap\n  root((X))\n    A");
        assert_eq!(repaired.split('\n').next(), Some("mindmap"));
        assert!(!repaired.contains("Here is"));
    }

    #[test]
    fn prefers_standalone_keyword_line_over_mention_in_prose() {
        let repaired = repair_mindmap("Aquí tienes tu mindmap:\nmindmap\n  root((X))\n    A");
        assert_eq!(repaired, "mindmap\n  root((X))\n    A");
    }

    #[test]
    fn synthesizes_missing_keyword() {
        let repaired = repair_mindmap("root((X))\n  A");
        assert!(repaired.starts_with("mindmap\nroot((X))"), "got: {repaired}");
        assert_eq!(repaired, "mindmap\nroot((X))\n    A");
    }

    #[test]
    fn moves_inline_content_off_keyword_line() {
        let repaired = repair_mindmap("mindmap root((X))\n  A");
        assert_eq!(repaired, "mindmap\nroot((X))\n    A");
    }

    #[test]
    fn reparents_rogue_top_level_nodes() {
        let raw = "mindmap\n  root((Tema))\n    📚 Hijo\nOtra raíz\n  Nieto";
        let repaired = repair_mindmap(raw);
        assert_eq!(
            repaired,
            "mindmap\n  root((Tema))\n    📚 Hijo\n    Otra raíz\n    Nieto"
        );
    }

    #[test]
    fn keeps_lines_before_root_and_comments_and_blanks() {
        let raw = "mindmap\nsuelto\n  root((X))\n\n# nota\n  A";
        let repaired = repair_mindmap(raw);
        assert_eq!(repaired, "mindmap\nsuelto\n  root((X))\n\n# nota\n    A");
    }

    #[test]
    fn duplicate_roots_are_not_removed() {
        let raw = "mindmap\n  root((A))\n  hijo\nroot((B))\n  otro";
        let repaired = repair_mindmap(raw);
        assert_eq!(count_root_markers(&repaired), 2);
        assert_eq!(
            repaired,
            "mindmap\n  root((A))\n    hijo\nroot((B))\n    otro"
        );
    }

    #[test]
    fn first_line_is_always_the_keyword() {
        let inputs = [
            "",
            "   ",
            "texto libre sin diagrama",
            "```mermaid\n```",
            "Claro! Aquí va:\n\n```mermaid\nmindmap\n root((Y))\n A\n```\nEspero que te sirva",
            "mindmap",
            "mindmapping es útil\nroot((Z))",
        ];
        for input in inputs {
            let repaired = repair_mindmap(input);
            assert_eq!(first_non_empty_line(&repaired), DIAGRAM_KEYWORD, "input: {input:?}");
        }
    }

    #[test]
    fn every_node_after_root_is_indented() {
        let inputs = [
            "mindmap\nroot((X))\nA\n B\n  C\n   D\n    E",
            "Texto\n```mermaid\nmindmap\n  root((X))\n A\n\tB\n```",
        ];
        for input in inputs {
            let repaired = repair_mindmap(input);
            let after_root = repaired
                .split('\n')
                .skip_while(|l| !l.contains(ROOT_MARKER))
                .skip(1);
            for line in after_root {
                let content = line.trim_start();
                if content.is_empty() || content.starts_with('#') || line.contains(ROOT_MARKER) {
                    continue;
                }
                assert!(indent_width(line) >= 4, "line {line:?} in {repaired:?}");
            }
        }
    }

    #[test]
    fn crlf_line_endings_are_normalised() {
        let repaired = repair_mindmap("mindmap\r\n  root((X))\r\nA\r\n");
        assert_eq!(repaired, "mindmap\n  root((X))\n    A");
        assert!(!repaired.contains('\r'));
    }

    #[test]
    fn tab_counts_as_single_indent_char() {
        assert_eq!(indent_width("\tA"), 1);
        assert_eq!(repair_mindmap("mindmap\nroot((X))\n\tA"), "mindmap\nroot((X))\n    A");
    }
}
