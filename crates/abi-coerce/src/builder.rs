//! Argument Builder: function name + JSON argument document -> ordered values.
//!
//! Arguments bind to parameters by position, never by name. The first failing
//! parameter aborts the whole call; no partial list is returned.

use abi_schema::{FunctionSignature, SignatureSource};
use rayon::prelude::*;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::coercer::ValueCoercer;
use crate::config::CoercionConfig;
use crate::error::{CoerceError, CoerceErrorKind, CoerceResult};
use crate::value::AbiValue;

#[derive(Debug, Clone, Copy, Default)]
pub struct ArgumentBuilder {
    coercer: ValueCoercer,
}

impl ArgumentBuilder {
    pub fn new(config: CoercionConfig) -> Self {
        Self {
            coercer: ValueCoercer::new(config),
        }
    }

    pub fn coercer(&self) -> &ValueCoercer {
        &self.coercer
    }

    /// Resolve `function` in `source`, parse `args_json` and coerce each
    /// argument against its declared parameter.
    pub fn build<S>(&self, source: &S, function: &str, args_json: &str) -> CoerceResult<Vec<AbiValue>>
    where
        S: SignatureSource + ?Sized,
    {
        let signature = source.lookup(function).ok_or_else(|| CoerceErrorKind::MethodNotFound {
            method: function.to_string(),
        })?;

        let doc: JsonValue =
            serde_json::from_str(args_json).map_err(|e| CoerceErrorKind::MalformedArguments {
                reason: e.to_string(),
            })?;

        let args = doc.as_array().ok_or_else(|| {
            CoerceErrorKind::shape(
                format!("array of arguments for {}", signature.canonical()),
                &doc,
            )
        })?;

        self.build_values(&signature, args)
    }

    /// Coerce already-parsed arguments against `signature`.
    pub fn build_values(
        &self,
        signature: &FunctionSignature,
        args: &[JsonValue],
    ) -> CoerceResult<Vec<AbiValue>> {
        debug!(
            function = %signature.name,
            params = signature.inputs.len(),
            supplied = args.len(),
            "building arguments"
        );

        let mut values = Vec::with_capacity(signature.inputs.len());
        for (i, param) in signature.inputs.iter().enumerate() {
            let result = match args.get(i) {
                Some(arg) => self.coercer.coerce(arg, &param.node),
                None => Err(CoerceError::new(CoerceErrorKind::MissingArgument {
                    supplied: args.len(),
                })),
            };
            match result {
                Ok(value) => values.push(value),
                Err(err) => {
                    let err = err.in_parameter(i, param.name.as_str());
                    warn!(
                        function = %signature.name,
                        index = i,
                        param = %param.name,
                        code = err.code(),
                        path = %err.path_string(),
                        "argument coercion failed"
                    );
                    return Err(err);
                }
            }
        }

        if args.len() > signature.inputs.len() {
            let err = CoerceError::new(CoerceErrorKind::ArgumentCountMismatch {
                expected: signature.inputs.len(),
                supplied: args.len(),
            });
            warn!(function = %signature.name, code = err.code(), "too many arguments");
            return Err(err);
        }

        Ok(values)
    }

    /// Build several independent argument documents for one function in
    /// parallel. Results are returned in input order.
    pub fn build_many<S>(
        &self,
        source: &S,
        function: &str,
        docs: &[String],
    ) -> Vec<CoerceResult<Vec<AbiValue>>>
    where
        S: SignatureSource + Sync + ?Sized,
    {
        docs.par_iter()
            .map(|doc| self.build(source, function, doc))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abi_schema::{CatalogSnapshot, Param, TupleField, TypeNode};

    fn catalog() -> CatalogSnapshot {
        CatalogSnapshot::new(vec![
            FunctionSignature::new(
                "transfer",
                vec![
                    Param::new("to", TypeNode::address()),
                    Param::new("amount", TypeNode::uint(256)),
                ],
            ),
            FunctionSignature::new(
                "submit",
                vec![Param::new(
                    "order",
                    TypeNode::Tuple(vec![
                        TupleField::new("id", TypeNode::uint(32)),
                        TupleField::new("memo", TypeNode::DynamicBytes),
                    ]),
                )],
            ),
            FunctionSignature::new("ping", vec![]),
        ])
    }

    const TO: &str = "0x1111111111111111111111111111111111111111";

    #[test]
    fn test_build_transfer() {
        let values = ArgumentBuilder::default()
            .build(&catalog(), "transfer", &format!(r#"["{}", 1000]"#, TO))
            .unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0], AbiValue::Address([0x11; 20]));
        assert_eq!(values[1], AbiValue::uint(256, 1000));
    }

    #[test]
    fn test_no_parameters() {
        let values = ArgumentBuilder::default().build(&catalog(), "ping", "[]").unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn test_unknown_method_ignores_arguments() {
        for args in ["[]", "not json", "[1, 2, 3]"] {
            let err = ArgumentBuilder::default()
                .build(&catalog(), "approve", args)
                .unwrap_err();
            assert_eq!(
                err.kind,
                CoerceErrorKind::MethodNotFound {
                    method: "approve".to_string()
                }
            );
        }
    }

    #[test]
    fn test_malformed_and_non_array_documents() {
        let builder = ArgumentBuilder::default();
        let err = builder.build(&catalog(), "transfer", "[1,").unwrap_err();
        assert_eq!(err.code(), "MALFORMED_ARGUMENTS");

        let err = builder
            .build(&catalog(), "transfer", r#"{"to": "0x", "amount": 1}"#)
            .unwrap_err();
        assert_eq!(
            err.kind,
            CoerceErrorKind::ShapeMismatch {
                expected: "array of arguments for transfer(address,uint256)".to_string(),
                found: "object".to_string(),
            }
        );
    }

    #[test]
    fn test_fail_fast_reports_first_bad_parameter() {
        let err = ArgumentBuilder::default()
            .build(&catalog(), "transfer", &format!(r#"["{}", true, "extra"]"#, TO))
            .unwrap_err();
        let param = err.parameter.clone().unwrap();
        assert_eq!(param.index, 1);
        assert_eq!(param.name, "amount");
        assert_eq!(err.code(), "GENERIC_DECODE_FAILURE");
    }

    #[test]
    fn test_missing_trailing_argument() {
        let err = ArgumentBuilder::default()
            .build(&catalog(), "transfer", &format!(r#"["{}"]"#, TO))
            .unwrap_err();
        assert_eq!(err.kind, CoerceErrorKind::MissingArgument { supplied: 1 });
        assert_eq!(err.parameter.unwrap().index, 1);
    }

    #[test]
    fn test_surplus_arguments() {
        let err = ArgumentBuilder::default()
            .build(&catalog(), "transfer", &format!(r#"["{}", 1, 2]"#, TO))
            .unwrap_err();
        assert_eq!(
            err.kind,
            CoerceErrorKind::ArgumentCountMismatch {
                expected: 2,
                supplied: 3
            }
        );
        assert!(err.parameter.is_none());
    }

    #[test]
    fn test_nested_failure_reports_path() {
        let err = ArgumentBuilder::default()
            .build(&catalog(), "submit", r#"[{"id": 1, "memo": 7}]"#)
            .unwrap_err();
        assert_eq!(err.path_string(), "memo");
        assert_eq!(
            err.to_string(),
            "argument 0 ('order') at memo: GENERIC_DECODE_FAILURE: cannot decode bytes: expected hex string, text or byte array, found number"
        );
    }

    #[test]
    fn test_build_many_keeps_order() {
        let docs = vec![
            format!(r#"["{}", 1]"#, TO),
            format!(r#"["{}", -1]"#, TO),
            format!(r#"["{}", 3]"#, TO),
        ];
        let results = ArgumentBuilder::default().build_many(&catalog(), "transfer", &docs);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap()[1], AbiValue::uint(256, 1));
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap()[1], AbiValue::uint(256, 3));
    }
}
