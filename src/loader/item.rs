use anyhow::{bail, Context};
use serde::Serialize;
use serde_json::Value;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    /// question text
    pub question: String,

    /// answer options in display order, at least two
    pub options: Vec<String>,

    /// index of the correct entry in `options`
    pub correct_index: usize,

    /// shown after the item is answered, right or wrong
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Item {
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }
}

/// Validates a whole item document. The first bad element rejects the set.
pub fn parse_items(document: &Value) -> anyhow::Result<Vec<Item>> {
    let elements = document
        .as_array()
        .context("item document must be a JSON array")?;
    if elements.is_empty() {
        bail!("item document contains no items");
    }

    elements
        .iter()
        .enumerate()
        .map(|(index, element)| parse_item(element).context(format!("item {} is invalid", index)))
        .collect()
}

fn parse_item(element: &Value) -> anyhow::Result<Item> {
    if !element.is_object() {
        bail!("expected an object");
    }

    let question = element
        .get("pregunta")
        .and_then(|q| q.as_str())
        .context("must set 'pregunta' as a string")?
        .to_string();

    let options = element
        .get("opciones")
        .and_then(|o| o.as_array())
        .context("must set 'opciones' as an array")?
        .iter()
        .map(|o| o.as_str().map(str::to_string))
        .collect::<Option<Vec<String>>>()
        .context("every entry of 'opciones' must be a string")?;
    if options.len() < 2 {
        bail!("'opciones' needs at least 2 entries, found {}", options.len());
    }

    let correct_index: usize = get_attribute(element, "correcta")
        .context("must set 'correcta' as a non-negative integer")?;
    if correct_index >= options.len() {
        bail!(
            "'correcta' is {} but there are only {} options",
            correct_index,
            options.len()
        );
    }

    let explanation: Option<String> = get_attribute(element, "justificacion");

    Ok(Item {
        question,
        options,
        correct_index,
        explanation,
    })
}

fn get_attribute<T>(value: &Value, attribute: &str) -> Option<T>
where
    T: FromStr,
{
    value.get(attribute).and_then(|v| match v {
        Value::String(s) => T::from_str(s.trim()).ok(),
        Value::Number(n) => {
            if let Some(i) = n.as_u64() {
                T::from_str(&i.to_string()).ok()
            } else if let Some(i) = n.as_i64() {
                T::from_str(&i.to_string()).ok()
            } else {
                // 2.0 prints as "2", 2.5 stays "2.5" and fails integer parsing
                n.as_f64().and_then(|f| T::from_str(&f.to_string()).ok())
            }
        }
        Value::Bool(b) => T::from_str(&b.to_string()).ok(),
        _ => None,
    })
}

/// Single built-in item used whenever the remote set can't be used.
pub fn fallback_items() -> Vec<Item> {
    vec![Item {
        question: String::from(
            "¿Cuál de las siguientes es una estrategia eficaz para manejar el estrés competitivo?",
        ),
        options: vec![
            String::from("Evitar pensar en la competencia"),
            String::from("Practicar técnicas de respiración y visualización"),
            String::from("Entrenar más horas sin descanso"),
            String::from("Ignorar las señales del cuerpo"),
        ],
        correct_index: 1,
        explanation: Some(String::from(
            "La respiración controlada y la visualización reducen la activación fisiológica \
             y mejoran la concentración antes y durante la competencia.",
        )),
    }]
}
