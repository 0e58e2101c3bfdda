//! Category lookup with ordered fallback strategies.
//!
//! Category values in the backup table are free text with inconsistent
//! casing and accents, and the `busqueda_categoria` stored function that is
//! supposed to normalize the lookup does not behave the same on every
//! deployment (it may be missing entirely, expect a pattern, expect
//! lowercase, or expect a numeric id). Instead of guessing its contract we
//! try a fixed sequence of argument shapes until one returns rows, then fall
//! back to a plain LIKE scan on the base table. A failing attempt is logged
//! and skipped, never propagated.

use diesel::sql_types::{BigInt, Double, Text};
use diesel_async::RunQueryDsl;

use crate::models::Record;

use super::error::StoreError;
use super::pool::DbPool;
use super::records::RecordRepository;

/// Strategy tag of the final table-scan fallback.
pub const FALLBACK_TAG: &str = "fallback_table_query";

/// Argument shape an attempt feeds to the stored function.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptArg {
    Text(String),
    Int(i64),
    Float(f64),
}

/// One attempt against the stored function.
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    /// Tag reported to the caller when this attempt wins.
    pub tag: &'static str,
    pub arg: AttemptArg,
    /// Wrap the argument in unaccent() - PostgreSQL only; on backends
    /// without the capability the attempt is skipped, not failed.
    pub unaccent: bool,
}

/// The rows plus the strategy that produced them.
#[derive(Debug)]
pub struct CategoryResolution {
    pub strategy: &'static str,
    pub rows: Vec<Record>,
}

/// Build the fixed attempt sequence for a category value.
///
/// The order is part of the contract: exact text, wildcard, lowercase,
/// lowercase wildcard, accent-stripped, and - only when the value parses as
/// a number - a numeric call.
pub fn attempt_plan(categoria: &str) -> Vec<Attempt> {
    let lower = categoria.to_lowercase();
    let mut attempts = vec![
        Attempt {
            tag: "direct",
            arg: AttemptArg::Text(categoria.to_string()),
            unaccent: false,
        },
        Attempt {
            tag: "wildcard_direct",
            arg: AttemptArg::Text(format!("%{categoria}%")),
            unaccent: false,
        },
        Attempt {
            tag: "lowercase",
            arg: AttemptArg::Text(lower.clone()),
            unaccent: false,
        },
        Attempt {
            tag: "wildcard_lowercase",
            arg: AttemptArg::Text(format!("%{lower}%")),
            unaccent: false,
        },
        Attempt {
            tag: "unaccent_direct",
            arg: AttemptArg::Text(categoria.to_string()),
            unaccent: true,
        },
    ];

    if let Ok(n) = categoria.parse::<i64>() {
        attempts.push(Attempt {
            tag: "numeric",
            arg: AttemptArg::Int(n),
            unaccent: false,
        });
    } else if let Ok(f) = categoria.parse::<f64>() {
        attempts.push(Attempt {
            tag: "numeric",
            arg: AttemptArg::Float(f),
            unaccent: false,
        });
    }

    attempts
}

impl RecordRepository {
    /// Resolve a category value to rows, trying each strategy in order.
    ///
    /// Never returns an error for a failed stored-function attempt - only
    /// the final table-scan fallback can fail the resolution.
    pub(super) async fn resolve_category(
        &self,
        categoria: &str,
    ) -> Result<CategoryResolution, StoreError> {
        for attempt in attempt_plan(categoria) {
            match self.try_category_fn(&attempt).await {
                Ok(rows) if !rows.is_empty() => {
                    tracing::debug!(
                        strategy = attempt.tag,
                        count = rows.len(),
                        "stored function matched"
                    );
                    return Ok(CategoryResolution {
                        strategy: attempt.tag,
                        rows,
                    });
                }
                Ok(_) => {
                    tracing::debug!(strategy = attempt.tag, "stored function returned no rows");
                }
                Err(e) => {
                    // The function may be missing or typed differently on
                    // this deployment; a failure here means "try the next
                    // shape", not "fail the request".
                    tracing::warn!(
                        strategy = attempt.tag,
                        error = %e,
                        "stored function attempt failed"
                    );
                }
            }
        }

        tracing::debug!(categoria, "falling back to direct table scan");
        let rows = self.by_category_scan(categoria).await?;
        Ok(CategoryResolution {
            strategy: FALLBACK_TAG,
            rows,
        })
    }

    /// Run one stored-function attempt.
    ///
    /// The placeholder syntax differs per backend, so the SQL text is chosen
    /// here and nowhere else.
    async fn try_category_fn(&self, attempt: &Attempt) -> Result<Vec<Record>, StoreError> {
        self.run(async {
            match &self.pool {
                DbPool::Postgres(pool) => {
                    let mut conn = pool.get().await?;
                    let sql = if attempt.unaccent {
                        "SELECT * FROM busqueda_categoria(unaccent($1))"
                    } else {
                        "SELECT * FROM busqueda_categoria($1)"
                    };
                    let rows = match &attempt.arg {
                        AttemptArg::Text(v) => {
                            diesel::sql_query(sql)
                                .bind::<Text, _>(v.clone())
                                .load::<Record>(&mut conn)
                                .await?
                        }
                        AttemptArg::Int(v) => {
                            diesel::sql_query(sql)
                                .bind::<BigInt, _>(*v)
                                .load::<Record>(&mut conn)
                                .await?
                        }
                        AttemptArg::Float(v) => {
                            diesel::sql_query(sql)
                                .bind::<Double, _>(*v)
                                .load::<Record>(&mut conn)
                                .await?
                        }
                    };
                    Ok(rows)
                }
                #[cfg(feature = "mysql")]
                DbPool::Mysql(pool) => {
                    // MySQL has no unaccent(); report the attempt as empty so
                    // resolution moves on instead of aborting.
                    if attempt.unaccent {
                        return Ok(Vec::new());
                    }
                    let mut conn = pool.get().await?;
                    let sql = "SELECT * FROM busqueda_categoria(?)";
                    let rows = match &attempt.arg {
                        AttemptArg::Text(v) => {
                            diesel::sql_query(sql)
                                .bind::<Text, _>(v.clone())
                                .load::<Record>(&mut conn)
                                .await?
                        }
                        AttemptArg::Int(v) => {
                            diesel::sql_query(sql)
                                .bind::<BigInt, _>(*v)
                                .load::<Record>(&mut conn)
                                .await?
                        }
                        AttemptArg::Float(v) => {
                            diesel::sql_query(sql)
                                .bind::<Double, _>(*v)
                                .load::<Record>(&mut conn)
                                .await?
                        }
                    };
                    Ok(rows)
                }
            }
        })
        .await
    }
}
