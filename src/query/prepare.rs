//! Parameter preamble and procedure invocation text.

use super::encoding::{quote_string, ParamValue};

/// Prepend a `CYPHER` parameter preamble to a query.
///
/// The preamble is emitted unconditionally; each parameter renders as
/// `name=<encoded value>` in the order given, followed by the original
/// query text:
///
/// ```
/// use redigraph::query::{prepare_query, ParamValue};
///
/// let prepared = prepare_query("RETURN $p", &[("p", ParamValue::from("a\"b"))]);
/// assert_eq!(prepared, "CYPHER p=\"a\\\"b\" RETURN $p");
/// ```
pub fn prepare_query(query: &str, params: &[(&str, ParamValue)]) -> String {
    let mut prepared = String::with_capacity(query.len() + 16 * params.len());

    prepared.push_str("CYPHER ");
    for (name, value) in params {
        prepared.push_str(name);
        prepared.push('=');
        prepared.push_str(&value.encode());
        prepared.push(' ');
    }
    prepared.push_str(query);

    prepared
}

/// Build the invocation text for a server-side procedure:
/// `CALL <procedure>(<quoted args>)`.
pub fn procedure_call(procedure: &str, args: &[&str]) -> String {
    let quoted: Vec<String> = args.iter().map(|a| quote_string(a)).collect();
    format!("CALL {}({})", procedure, quoted.join(","))
}
