//! Text views of the quiz page. Nothing here touches session state.

use crate::loader::{Item, LoadDiagnostics};
use crate::session::{Feedback, Summary, Verdict};

pub const TITLE: &str = "Cuestionario: Estrés en el Deporte de Alto Rendimiento";
pub const CAPTION: &str =
    "Responde cada pregunta. Obtendrás retroalimentación inmediata y un puntaje final al terminar.";

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

pub fn header() -> String {
    format!("{BOLD}{}{RESET}\n{}\n", TITLE, CAPTION)
}

pub fn load_warning(diagnostics: &LoadDiagnostics) -> String {
    let mut out = String::from(
        "⚠ No se pudieron cargar las preguntas remotas; se usa el cuestionario de respaldo.\n",
    );
    out.push_str("Diagnóstico:\n");
    out.push_str("  URLs intentadas:\n");
    for url in &diagnostics.attempted_urls {
        out.push_str(&format!("    - {}\n", url));
    }
    out.push_str(&format!(
        "  Último error: {}\n",
        diagnostics.last_error.as_deref().unwrap_or("desconocido")
    ));
    out
}

pub fn question(item: &Item, index: usize, total: usize) -> String {
    let mut out = format!("\nPregunta {} de {}\n{}\n", index + 1, total, item.question);
    for (n, option) in item.options.iter().enumerate() {
        out.push_str(&format!("  {}) {}\n", n + 1, option));
    }
    out.push_str(&format!(
        "Elige una opción (1-{}) y presiona Enter para responder: ",
        item.options.len()
    ));
    out
}

pub fn feedback(feedback: &Feedback, is_last: bool) -> String {
    let mut out = if feedback.correct {
        String::from("✅ ¡Correcto!\n")
    } else {
        format!(
            "❌ Incorrecto. La respuesta correcta es: {}\n",
            feedback.correct_option
        )
    };
    if let Some(ref explanation) = feedback.explanation {
        out.push_str(&format!("Justificación: {}\n", explanation));
    }
    out.push_str(if is_last {
        "Presiona Enter para ver tu resultado: "
    } else {
        "Presiona Enter para la siguiente pregunta: "
    });
    out
}

pub fn verdict_message(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Perfect => "¡Excelente! Respondiste todo correctamente.",
        Verdict::Positive => "¡Muy bien! Tienes un buen dominio del tema.",
        Verdict::Encouragement => "Sigue practicando, ¡puedes mejorar!",
    }
}

pub fn summary(summary: &Summary) -> String {
    format!(
        "\n{BOLD}Puntaje final: {}/{}{RESET}\nPorcentaje: {}%\n{}\n\
         Escribe 'r' para reiniciar o 'q' para salir: ",
        summary.score,
        summary.total,
        summary.whole_percentage(),
        verdict_message(summary.verdict)
    )
}

pub fn prompt_for_selection(option_count: usize) -> String {
    format!(
        "Selecciona una opción entre 1 y {} antes de responder: ",
        option_count
    )
}
