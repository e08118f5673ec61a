// src/counter.rs
//
// Sequence source for human-readable document numbers (SALE-0001, JO-0001,
// QTN-0001). The increment is a single upsert statement so concurrent
// callers never observe the same value.

pub async fn next_document_number<'e, E>(
    executor: E,
    name: &str,
    prefix: &str,
) -> Result<String, sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    let seq: i64 = sqlx::query_scalar(
        "INSERT INTO counters (name, seq) VALUES ($1, 1)
         ON CONFLICT (name) DO UPDATE SET seq = counters.seq + 1
         RETURNING seq",
    )
    .bind(name)
    .fetch_one(executor)
    .await?;

    Ok(format_document_number(prefix, seq))
}

fn format_document_number(prefix: &str, seq: i64) -> String {
    format!("{}-{:04}", prefix, seq)
}

#[cfg(test)]
mod tests {
    use super::format_document_number;

    #[test]
    fn pads_to_four_digits() {
        assert_eq!(format_document_number("SALE", 1), "SALE-0001");
        assert_eq!(format_document_number("JO", 42), "JO-0042");
        assert_eq!(format_document_number("QTN", 999), "QTN-0999");
    }

    #[test]
    fn grows_past_four_digits() {
        assert_eq!(format_document_number("SALE", 12345), "SALE-12345");
    }
}
