//! CLI binary for the ADS client.
//!
//! Usage: ads search "dark matter" --rows 10 --max-pages 2

#[cfg(feature = "cli")]
mod cli {
    use ads_client::network::{self, Structure};
    use ads_client::{AdsClient, AdsError, Config, QueryBuilder, Record, Relation, Sort};
    use clap::{Parser, Subcommand};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    #[derive(Parser)]
    #[command(name = "ads", about = "NASA ADS search client", version)]
    struct Cli {
        /// API token (overrides ADS_API_TOKEN / ADS_DEV_KEY and ~/.ads/token)
        #[arg(long, global = true)]
        token: Option<String>,

        /// API root URL
        #[arg(long, global = true)]
        api_url: Option<String>,

        /// Output format
        #[arg(long, global = true, default_value = "table")]
        output: OutputFormat,

        /// Increase log verbosity (-v debug, -vv trace)
        #[arg(short, long, global = true, action = clap::ArgAction::Count)]
        verbose: u8,

        #[command(subcommand)]
        command: Commands,
    }

    #[derive(Clone, Copy, clap::ValueEnum)]
    enum OutputFormat {
        Table,
        Json,
    }

    #[derive(Subcommand)]
    enum Commands {
        /// Search ADS, fetching pages until all results or the page cap
        Search {
            /// Search query (ADS syntax)
            query: String,
            /// Records per page
            #[arg(short, long, default_value = "50")]
            rows: u32,
            /// Maximum number of pages to fetch
            #[arg(short, long, default_value = "1")]
            max_pages: u32,
            /// Sort order (e.g., "date desc", "citation_count desc")
            #[arg(short, long)]
            sort: Option<String>,
            /// Fields to return (comma-separated)
            #[arg(short, long)]
            fields: Option<String>,
            /// Filter query
            #[arg(long)]
            fq: Option<String>,
        },
        /// Get citation metrics for papers
        Metrics {
            /// Bibcodes
            bibcodes: Vec<String>,
        },
        /// Print the citation (or reference) tree of a paper as JSON
        Tree {
            /// Bibcode
            bibcode: String,
            /// Levels to fetch
            #[arg(short, long, default_value = "1")]
            depth: u32,
            /// Follow references instead of citations
            #[arg(long)]
            references: bool,
        },
    }

    fn init_tracing(verbose: u8) {
        let level = match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        };
        tracing_subscriber::registry()
            .with(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new(format!("ads_client={}", level))),
            )
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    fn make_client(token: Option<String>, api_url: Option<&str>) -> ads_client::error::Result<AdsClient> {
        let config = match api_url {
            Some(url) => Config::default().with_api_url(url)?,
            None => Config::default(),
        };
        let client = AdsClient::new(config);
        Ok(match token {
            Some(t) => client.with_token(t),
            None => client,
        })
    }

    fn cell(record: &Record, field: &str) -> String {
        match record.get(field) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }

    fn print_records_table(records: &[Record]) {
        use comfy_table::{ContentArrangement, Table};

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Bibcode", "Year", "First Author", "Authors"]);

        for record in records {
            let authors = record
                .get("author")
                .and_then(|a| a.as_array())
                .map(|a| a.len().to_string())
                .unwrap_or_default();
            table.add_row(vec![
                cell(record, "bibcode"),
                cell(record, "year"),
                cell(record, "first_author"),
                authors,
            ]);
        }

        println!("{table}");
    }

    pub fn run() -> ads_client::error::Result<()> {
        let cli = Cli::parse();
        init_tracing(cli.verbose);
        let client = make_client(cli.token, cli.api_url.as_deref())?;

        match cli.command {
            Commands::Search {
                query,
                rows,
                max_pages,
                sort,
                fields,
                fq,
            } => {
                let mut builder = client.search(query).rows(rows).max_pages(max_pages);
                if let Some(sort) = sort {
                    let sort = Sort::parse(&sort)
                        .ok_or_else(|| AdsError::InvalidQuery(format!("bad sort {:?}", sort)))?;
                    builder = builder.sort(sort);
                }
                if let Some(fields) = fields {
                    builder = builder.fields(fields.split(',').map(str::trim));
                }
                if let Some(fq) = fq {
                    builder = builder.fq(fq);
                }

                let mut search = builder.build()?;
                let records = search.by_ref().collect::<Result<Vec<_>, _>>()?;

                match cli.output {
                    OutputFormat::Json => {
                        let docs: Vec<_> = records.iter().map(Record::fields).collect();
                        let out = serde_json::json!({
                            "progress": search.progress(),
                            "stop": search.stop_reason(),
                            "ratelimits": search.ratelimits(),
                            "docs": docs,
                        });
                        println!("{}", serde_json::to_string_pretty(&out)?);
                    }
                    OutputFormat::Table => {
                        print_records_table(&records);
                        if let Some(reason) = search.stop_reason() {
                            println!("{} ({})", reason, search.progress());
                        }
                    }
                }
            }

            Commands::Metrics { bibcodes } => {
                let mut query = client.metrics(bibcodes);
                let metrics = query.execute()?;
                println!("{}", serde_json::to_string_pretty(metrics)?);
            }

            Commands::Tree {
                bibcode,
                depth,
                references,
            } => {
                let relation = if references {
                    Relation::References
                } else {
                    Relation::Citations
                };
                let q = QueryBuilder::new().bibcode(&bibcode).build();
                let mut paper = client
                    .search(q)
                    .rows(1)
                    .max_pages(1)
                    .build()?
                    .next()
                    .transpose()?
                    .ok_or_else(|| AdsError::NotFound(bibcode.clone()))?;
                let total = match relation {
                    Relation::Citations => paper.build_citation_tree(depth)?,
                    Relation::References => paper.build_reference_tree(depth)?,
                };
                tracing::info!(total, "tree built");
                let json = network::export(
                    std::slice::from_ref(&paper),
                    relation,
                    Structure::Nested,
                    |r| r.to_string(),
                )?;
                println!("{}", json);
            }
        }

        Ok(())
    }
}

#[cfg(feature = "cli")]
fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("This binary requires the 'cli' feature. Build with: cargo build --features cli");
    std::process::exit(1);
}
