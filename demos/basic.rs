use pipedb_http::{Params, PipeDbClient, Value};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let url = std::env::var("PIPEDB_URL")?;

    let db = PipeDbClient::from_url(url)?;

    db.execute(
        "CREATE TABLE IF NOT EXISTS users (id INTEGER PRIMARY KEY, name TEXT NOT NULL)",
        (),
    )
    .await?;

    db.execute("INSERT INTO users (name) VALUES (?)", [Value::text("Ada")])
        .await?;

    let rows = db
        .execute(
            "SELECT id, name FROM users WHERE name = :name",
            Params::named([("name", Value::text("Ada"))]),
        )
        .await?;

    for row in rows {
        println!("{row:?}");
    }

    Ok(())
}
