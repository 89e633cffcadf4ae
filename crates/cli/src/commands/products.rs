//! Product commands backed by the HTTP client.

use std::io::{BufRead, Write};

use anyhow::bail;
use catalog_client::{ClientError, FieldError, ListParams, ProductClient, ProductInput};
use serde::Serialize;

pub async fn list(client: &ProductClient, params: &ListParams) -> anyhow::Result<()> {
    let page = client.list(params).await.map_err(report)?;
    print_json(&page)
}

pub async fn get(client: &ProductClient, id: i64) -> anyhow::Result<()> {
    let product = client.get(id).await.map_err(report)?;
    print_json(&product)
}

pub async fn create(client: &ProductClient, input: ProductInput) -> anyhow::Result<()> {
    check(&input)?;
    let product = client.create(&input).await.map_err(report)?;
    print_json(&product)
}

pub async fn update(client: &ProductClient, id: i64, input: ProductInput) -> anyhow::Result<()> {
    check(&input)?;
    let product = client.update(id, &input).await.map_err(report)?;
    print_json(&product)
}

pub async fn delete(client: &ProductClient, id: i64, yes: bool) -> anyhow::Result<()> {
    if !yes && !confirm(&format!("Delete product {id}?"))? {
        println!("Aborted");
        return Ok(());
    }

    let ack = client.delete(id).await.map_err(report)?;
    println!("{}", ack.message);
    Ok(())
}

/// Refuse to send input the server would reject.
fn check(input: &ProductInput) -> anyhow::Result<()> {
    if let Err(fields) = input.validate() {
        print_fields(&fields);
        bail!("invalid product");
    }
    Ok(())
}

/// Turn a client error into the message a user should see.
fn report(err: ClientError) -> anyhow::Error {
    tracing::debug!(error = %err, "request failed");
    if let ClientError::Validation { fields, .. } = &err {
        print_fields(fields);
    }
    anyhow::anyhow!("{}", err.user_message())
}

fn print_fields(fields: &[FieldError]) {
    for field in fields {
        eprintln!("  {}: {}", field.field, field.message);
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_explicit_yes_confirms() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }

    #[test]
    fn user_message_is_surfaced() {
        let err = report(ClientError::NotFound {
            message: "Product not found".to_string(),
        });
        assert_eq!(err.to_string(), "Product not found");
    }
}
