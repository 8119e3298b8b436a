//! Parameter sets - Recognized generation options and their defaults
//!
//! Every provider owns one immutable [`ParameterSet`]. Raw operator answers
//! are resolved against it into a [`GenerationRequest`]: blank answers take
//! the documented default, everything else must parse into the option's
//! declared type.

use std::collections::BTreeMap;

use domain::{GenerationRequest, OptionValue};
use tracing::{debug, warn};

use crate::error::InvocationError;
use crate::ports::InputSource;

/// Raw key under which the model identifier is collected
pub const MODEL_ID: &str = "modelId";

/// Raw key under which the prompt is collected
pub const PROMPT: &str = "prompt";

/// Raw operator answers, keyed by option name
pub type RawInputs = BTreeMap<String, String>;

/// Semantic type of a generation option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    Float,
    Int,
    Text,
    /// Comma separated list of strings
    List,
}

/// One recognized option with its documented default
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub default: &'static str,
    pub kind: ParameterKind,
}

impl ParameterSpec {
    pub const fn float(name: &'static str, default: &'static str) -> Self {
        Self {
            name,
            default,
            kind: ParameterKind::Float,
        }
    }

    pub const fn int(name: &'static str, default: &'static str) -> Self {
        Self {
            name,
            default,
            kind: ParameterKind::Int,
        }
    }

    pub const fn text(name: &'static str, default: &'static str) -> Self {
        Self {
            name,
            default,
            kind: ParameterKind::Text,
        }
    }

    pub const fn list(name: &'static str) -> Self {
        Self {
            name,
            default: "",
            kind: ParameterKind::List,
        }
    }

    /// Parse a raw answer, substituting the default when it is blank
    pub fn parse(&self, raw: Option<&str>) -> Result<OptionValue, InvocationError> {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty());
        let value = raw.unwrap_or(self.default);

        match self.kind {
            ParameterKind::Float => value
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(OptionValue::Float)
                .ok_or_else(|| InvocationError::validation(self.name, value, "expected a number")),
            ParameterKind::Int => value.parse::<i64>().map(OptionValue::Int).map_err(|e| {
                InvocationError::validation(self.name, value, format!("expected an integer ({e})"))
            }),
            ParameterKind::Text => Ok(OptionValue::Text(value.to_string())),
            ParameterKind::List => Ok(OptionValue::List(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(ToString::to_string)
                    .collect(),
            )),
        }
    }
}

/// The recognized options of one model family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterSet {
    /// Default model identifier
    pub model_id: &'static str,
    /// Label shown when asking for the prompt
    pub prompt_label: &'static str,
    /// Default prompt
    pub prompt: &'static str,
    /// Options in the order they are asked for
    pub options: &'static [ParameterSpec],
}

impl ParameterSet {
    /// Look up an option by name
    #[must_use]
    pub fn spec(&self, name: &str) -> Option<&ParameterSpec> {
        self.options.iter().find(|spec| spec.name == name)
    }

    /// Resolve raw answers into a complete request
    pub fn resolve(&self, raw: &RawInputs) -> Result<GenerationRequest, InvocationError> {
        let pick = |key: &str, default: &'static str| -> String {
            raw.get(key)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .unwrap_or(default)
                .to_string()
        };

        let mut options = BTreeMap::new();
        for spec in self.options {
            let value = spec.parse(raw.get(spec.name).map(String::as_str))?;
            options.insert(spec.name.to_string(), value);
        }

        let request = GenerationRequest::new(
            pick(MODEL_ID, self.model_id),
            pick(PROMPT, self.prompt),
            options,
        )?;

        debug!(
            model = %request.model_id(),
            options = request.options().len(),
            "Resolved generation request"
        );

        Ok(request)
    }

    /// Request with every default applied
    pub fn defaults(&self) -> Result<GenerationRequest, InvocationError> {
        self.resolve(&RawInputs::new())
    }

    /// Ask the input source for the model id, every option and the prompt
    ///
    /// An answer that does not parse into its option's type is logged and
    /// the same option is asked again.
    pub fn collect(&self, input: &mut dyn InputSource) -> Result<RawInputs, InvocationError> {
        let mut raw = RawInputs::new();

        raw.insert(MODEL_ID.to_string(), input.get(MODEL_ID, self.model_id)?);
        for spec in self.options {
            let label = match spec.kind {
                ParameterKind::List => format!("comma separated {}", spec.name),
                _ => spec.name.to_string(),
            };
            let default = if spec.kind == ParameterKind::List && spec.default.is_empty() {
                "None"
            } else {
                spec.default
            };
            raw.insert(spec.name.to_string(), ask_until_valid(input, spec, &label, default)?);
        }
        raw.insert(PROMPT.to_string(), input.get(self.prompt_label, self.prompt)?);

        Ok(raw)
    }
}

fn ask_until_valid(
    input: &mut dyn InputSource,
    spec: &ParameterSpec,
    label: &str,
    default: &str,
) -> Result<String, InvocationError> {
    loop {
        let answer = input.get(label, default)?;
        match spec.parse(Some(&answer)) {
            Ok(_) => return Ok(answer),
            // a blank answer means the default itself is unusable
            Err(e) if e.is_recoverable() && !answer.trim().is_empty() => {
                warn!(option = spec.name, error = %e, "Invalid value, asking again");
            },
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::scripted::ScriptedInputSource;

    const SAMPLE: ParameterSet = ParameterSet {
        model_id: "amazon.titan-text-express-v1",
        prompt_label: "Question",
        prompt: "Why do we dream?",
        options: &[
            ParameterSpec::float("temperature", "0.9"),
            ParameterSpec::int("maxTokenCount", "512"),
            ParameterSpec::text("quality", "standard"),
            ParameterSpec::list("stopSequences"),
        ],
    };

    fn raw(pairs: &[(&str, &str)]) -> RawInputs {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn empty_input_resolves_to_defaults() {
        let req = SAMPLE.defaults().unwrap();
        assert_eq!(req.model_id(), "amazon.titan-text-express-v1");
        assert_eq!(req.prompt(), "Why do we dream?");
        assert!((req.float("temperature").unwrap() - 0.9).abs() < f64::EPSILON);
        assert_eq!(req.int("maxTokenCount").unwrap(), 512);
        assert_eq!(req.text("quality").unwrap(), "standard");
        assert!(req.list("stopSequences").unwrap().is_empty());
    }

    #[test]
    fn blank_answers_take_defaults() {
        let req = SAMPLE
            .resolve(&raw(&[("temperature", "   "), (MODEL_ID, "")]))
            .unwrap();
        assert!((req.float("temperature").unwrap() - 0.9).abs() < f64::EPSILON);
        assert_eq!(req.model_id(), "amazon.titan-text-express-v1");
    }

    #[test]
    fn supplied_values_are_parsed() {
        let req = SAMPLE
            .resolve(&raw(&[
                ("temperature", "0.2"),
                ("maxTokenCount", "64"),
                ("stopSequences", "END, STOP,,"),
                (PROMPT, "Tell me a joke"),
                (MODEL_ID, "amazon.titan-text-lite-v1"),
            ]))
            .unwrap();
        assert!((req.float("temperature").unwrap() - 0.2).abs() < f64::EPSILON);
        assert_eq!(req.int("maxTokenCount").unwrap(), 64);
        assert_eq!(req.list("stopSequences").unwrap(), ["END", "STOP"]);
        assert_eq!(req.prompt(), "Tell me a joke");
        assert_eq!(req.model_id(), "amazon.titan-text-lite-v1");
    }

    #[test]
    fn non_numeric_float_is_rejected() {
        let err = SAMPLE.resolve(&raw(&[("temperature", "abc")])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("temperature"));
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn non_finite_float_is_rejected() {
        let err = SAMPLE.resolve(&raw(&[("temperature", "NaN")])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn fractional_int_is_rejected() {
        let err = SAMPLE.resolve(&raw(&[("maxTokenCount", "1.5")])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn collect_asks_model_options_then_prompt() {
        let mut input = ScriptedInputSource::new(["", "0.1", "", "", "END"]);
        let collected = SAMPLE.collect(&mut input).unwrap();

        assert_eq!(
            input.asked(),
            [
                "modelId",
                "temperature",
                "maxTokenCount",
                "quality",
                "comma separated stopSequences",
                "Question"
            ]
        );
        assert_eq!(collected["temperature"], "0.1");
        assert_eq!(collected["stopSequences"], "END");
        assert_eq!(collected[PROMPT], "");
    }

    #[test]
    fn invalid_answer_is_asked_again() {
        let mut input = ScriptedInputSource::new(["", "abc", "0.5", "", "", "", "Hi"]);
        let collected = SAMPLE.collect(&mut input).unwrap();

        assert_eq!(
            input.asked(),
            [
                "modelId",
                "temperature",
                "temperature",
                "maxTokenCount",
                "quality",
                "comma separated stopSequences",
                "Question"
            ]
        );
        assert_eq!(collected["temperature"], "0.5");
        assert_eq!(collected[PROMPT], "Hi");

        let req = SAMPLE.resolve(&collected).unwrap();
        assert!((req.float("temperature").unwrap() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn every_bad_answer_is_retried() {
        let mut input = ScriptedInputSource::new(["", "", "1.5", "ten", "64"]);
        let collected = SAMPLE.collect(&mut input).unwrap();
        assert_eq!(collected["maxTokenCount"], "64");
        assert_eq!(
            input.asked().iter().filter(|label| *label == "maxTokenCount").count(),
            3
        );
    }

    #[test]
    fn spec_lookup() {
        assert_eq!(SAMPLE.spec("quality").unwrap().kind, ParameterKind::Text);
        assert!(SAMPLE.spec("missing").is_none());
    }
}
