//! Command handlers

use anyhow::anyhow;
use skinlens_client::{AnalysisPipeline, ClientError, InferenceClient};
use skinlens_core::{
    AnalysisOutcome, Indicator,
    types::{
        Consultation, ConsultationRequest, Credentials, ImageFile, Product, ProductDraft,
        Registration, User,
    },
    validation::available_consultation_dates,
};
use skinlens_routing::{GuardDecision, RouteGuard};
use std::fmt::Write as _;
use std::path::Path;
use tracing::debug;

use crate::{
    AdminCommands, App, Commands, ConsultationCommands, ProductArgs, ProductCommands,
    RegisterArgs, UserCommands,
};

pub async fn run(app: &App, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Login { email, password } => {
            app.api
                .auth()
                .login(&Credentials::new(email.clone(), password))
                .await
                .map_err(user_error)?;
            println!("Signed in as {}", email);
        }
        Commands::Register(args) => {
            let email = args.email.clone();
            let created = app
                .api
                .auth()
                .register(&registration(args))
                .await
                .map_err(user_error)?;

            if created.tokens.is_some() {
                println!("Account created; signed in as {}", email);
            } else {
                println!("Account created; run `skinlens login --email {}` to sign in", email);
            }
        }
        Commands::Logout => {
            app.api.auth().logout().await.map_err(user_error)?;
            println!("Signed out");
        }
        Commands::Admin { command } => match command {
            AdminCommands::Login { email, password } => {
                app.admin
                    .login(&Credentials::new(email, password))
                    .await
                    .map_err(user_error)?;
                println!("Signed in as administrator");
            }
            AdminCommands::Logout => {
                app.admin.logout().await.map_err(user_error)?;
                println!("Left the admin session");
            }
        },
        Commands::Analyze { image, json } => analyze(app, &image, json).await?,
        Commands::Products { command } => products(app, command).await?,
        Commands::Users { command } => users(app, command).await?,
        Commands::Consultations { command } => consultations(app, command).await?,
        Commands::Guard { path } => {
            let guard = RouteGuard::new(app.config.routes.clone());
            match guard.check(&app.session, &path).await? {
                GuardDecision::Allow => println!("allow {}", path),
                GuardDecision::Redirect(redirect) => println!(
                    "redirect {} -> {}",
                    redirect.from.as_deref().unwrap_or(&path),
                    redirect.to
                ),
            }
        }
        Commands::Session => {
            let snapshot = app.session.snapshot().await?;
            println!("Session file:  {}", app.config.session_path().display());
            println!("Access token:  {}", presence(snapshot.access_token.is_some()));
            println!("Refresh token: {}", presence(snapshot.refresh_token.is_some()));
            println!("Admin session: {}", presence(snapshot.has_admin_session()));
        }
    }

    Ok(())
}

async fn analyze(app: &App, image: &Path, json: bool) -> anyhow::Result<()> {
    let image = load_image(image).await?;
    let inference = InferenceClient::new(app.config.inference_config())?;
    let pipeline =
        AnalysisPipeline::new(app.api.clone(), inference).with_policy(app.config.retry_policy());

    let outcome = pipeline.analyze(&image).await.map_err(user_error)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", format_outcome(&outcome));
    }
    Ok(())
}

async fn products(app: &App, command: ProductCommands) -> anyhow::Result<()> {
    let api = app.api.products();

    match command {
        ProductCommands::List => {
            let products = api.list().await.map_err(user_error)?;
            if products.is_empty() {
                println!("No products");
            }
            for product in &products {
                println!("{}", product_line(product));
            }
        }
        ProductCommands::Get { id } => {
            let product = api.get(id).await.map_err(user_error)?;
            println!("{}", serde_json::to_string_pretty(&product)?);
        }
        ProductCommands::Create(args) => {
            let product = api.create(&draft(args)).await.map_err(user_error)?;
            println!("Created {}", product_line(&product));
        }
        ProductCommands::Update { id, product } => {
            let product = api.update(id, &draft(product)).await.map_err(user_error)?;
            println!("Updated {}", product_line(&product));
        }
        ProductCommands::UpdateImage { id, image } => {
            let image = load_image(&image).await?;
            let product = api.update_image(id, image).await.map_err(user_error)?;
            println!(
                "Updated image of #{}: {}",
                product.id,
                product.image.as_deref().unwrap_or("(none)")
            );
        }
        ProductCommands::Delete { id } => {
            api.delete(id).await.map_err(user_error)?;
            println!("Deleted product #{}", id);
        }
    }

    Ok(())
}

async fn users(app: &App, command: UserCommands) -> anyhow::Result<()> {
    let api = app.api.users();

    match command {
        UserCommands::List => {
            for user in api.list().await.map_err(user_error)? {
                println!("{}", user_line(&user));
            }
        }
        UserCommands::Activate { id } => {
            let user = api.set_active(id, true).await.map_err(user_error)?;
            println!("{}", user_line(&user));
        }
        UserCommands::Deactivate { id } => {
            let user = api.set_active(id, false).await.map_err(user_error)?;
            println!("{}", user_line(&user));
        }
        UserCommands::Delete { id } => {
            api.delete(id).await.map_err(user_error)?;
            println!("Deleted user #{}", id);
        }
    }

    Ok(())
}

async fn consultations(app: &App, command: ConsultationCommands) -> anyhow::Result<()> {
    match command {
        ConsultationCommands::Create { date, message } => {
            let booked = app
                .api
                .consultations()
                .create(&ConsultationRequest { date, message })
                .await
                .map_err(user_error)?;
            println!("Requested {}", consultation_line(&booked));
        }
        ConsultationCommands::List => {
            let mine = app
                .api
                .consultations()
                .list_mine()
                .await
                .map_err(user_error)?;
            if mine.is_empty() {
                println!("No consultations");
            }
            for consultation in &mine {
                println!("{}", consultation_line(consultation));
            }
        }
        ConsultationCommands::Dates => {
            let today = chrono::Local::now().date_naive();
            for date in available_consultation_dates(today) {
                println!("{}", date.format("%Y-%m-%d (%A)"));
            }
        }
    }

    Ok(())
}

/// Replace a client error with the message meant for the user
fn user_error(err: ClientError) -> anyhow::Error {
    debug!("Command failed: {:?}", err);
    anyhow!(err.user_message())
}

async fn load_image(path: &Path) -> anyhow::Result<ImageFile> {
    ImageFile::from_path(path)
        .await
        .map_err(|e| user_error(e.into()))
}

fn registration(args: RegisterArgs) -> Registration {
    Registration {
        email: args.email,
        password: args.password,
        confirm_password: args.confirm_password,
        first_name: args.first_name,
        last_name: args.last_name,
        age: args.age,
        sex: args.sex,
        country: args.country,
        skin_type: args.skin_type,
        skin_concerns: args.skin_concerns,
    }
}

fn draft(args: ProductArgs) -> ProductDraft {
    ProductDraft {
        name: args.name,
        brand: args.brand,
        category: args.category,
        description: args.description,
        price: args.price,
        stock: args.stock,
        suitable_for: args.suitable_for,
        targets: args.targets,
        when_to_apply: args.when_to_apply,
    }
}

fn presence(present: bool) -> &'static str {
    if present { "present" } else { "absent" }
}

fn product_line(product: &Product) -> String {
    let stock = if product.in_stock() {
        format!("{} in stock", product.stock)
    } else {
        "out of stock".to_string()
    };
    format!(
        "#{} {} ({}) {:.2} - {}",
        product.id, product.name, product.brand, product.price, stock
    )
}

fn user_line(user: &User) -> String {
    format!(
        "#{} {} {} <{}> {}",
        user.id,
        user.first_name,
        user.last_name,
        user.email,
        if user.is_active { "active" } else { "inactive" }
    )
}

fn consultation_line(consultation: &Consultation) -> String {
    let mut line = consultation.date.clone();
    if let Some(id) = consultation.id {
        line = format!("#{} {}", id, line);
    }
    if let Some(status) = &consultation.status {
        let _ = write!(line, " [{}]", status);
    }
    if !consultation.message.is_empty() {
        let _ = write!(line, " {}", consultation.message);
    }
    line
}

fn format_outcome(outcome: &AnalysisOutcome) -> String {
    let result = &outcome.result;
    let confidence = result.confidence_display();
    let band = match confidence.indicator {
        Indicator::Warning => "low",
        Indicator::Caution => "moderate",
        Indicator::Success => "high",
    };

    let mut out = String::new();
    let _ = writeln!(out, "Condition:  {}", result.condition);
    let _ = writeln!(
        out,
        "Confidence: {} ({}, {})",
        confidence,
        band,
        confidence.indicator.color()
    );
    if let Some(message) = &result.message {
        let _ = writeln!(out, "Message:    {}", message);
    }
    if result.is_critical() {
        let _ = writeln!(
            out,
            "Attention:  this result needs a professional opinion; consider booking a consultation"
        );
    }
    if let Some(image_id) = outcome.image_id {
        let _ = writeln!(out, "Saved as image #{}", image_id);
    }

    let products = result.recommended_products();
    if !products.is_empty() {
        let _ = writeln!(out, "Recommended products:");
        for product in products {
            let _ = writeln!(out, "  {}", product_line(product));
        }
    }
    out
}
