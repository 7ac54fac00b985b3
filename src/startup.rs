use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::{guard, web, App, HttpServer};
use anyhow::Context;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tera::Tera;
use tracing_actix_web::TracingLogger;

use crate::auth_client::AuthClient;
use crate::configuration::{ApplicationBaseUrl, DatabaseSettings, Settings};
use crate::email_client::EmailClient;
use crate::notion_client::NotionClient;
use crate::payment_client::PaymentClient;
use crate::routes::{self, ContactRecipient, NewsletterAdmins, PaymentCatalog};
use crate::zapier_client::ZapierClient;

pub struct Application {
    pub port: u16,
    pub server: Server,
}

/// Clients for every hosted service the site talks to.
pub struct ServiceClients {
    pub email: EmailClient,
    pub auth: AuthClient,
    pub payment: PaymentClient,
    pub notion: NotionClient,
    pub zapier: Option<ZapierClient>,
}

/// Site-wide values handlers read but never change.
pub struct SiteSettings {
    pub base_url: ApplicationBaseUrl,
    pub contact_recipient: ContactRecipient,
    pub payment_catalog: PaymentCatalog,
    pub newsletter_admins: NewsletterAdmins,
}

impl ServiceClients {
    pub fn from_settings(config: &Settings) -> Result<Self, anyhow::Error> {
        let sender_email = config
            .email
            .sender()
            .map_err(|e| anyhow::anyhow!(e))
            .context("Invalid sender email.")?;
        let zapier_webhook = config
            .contact
            .zapier_webhook()
            .map_err(|e| anyhow::anyhow!(e))
            .context("Invalid Zapier webhook.")?;

        Ok(Self {
            email: EmailClient::new(
                config.email.base_url.clone(),
                sender_email,
                config.email.token.clone(),
                config.email.timeout(),
            ),
            auth: AuthClient::new(
                config.auth.base_url.clone(),
                config.auth.api_key.clone(),
                config.auth.timeout(),
            ),
            payment: PaymentClient::new(
                config.payment.base_url.clone(),
                config.payment.secret_key.clone(),
                config.payment.success_url.clone(),
                config.payment.cancel_url.clone(),
                config.payment.timeout(),
            ),
            notion: NotionClient::new(
                config.notion.base_url.clone(),
                config.notion.token.clone(),
                config.notion.database_id.clone(),
                config.notion.version.clone(),
                config.notion.timeout(),
            ),
            zapier: zapier_webhook.map(|url| ZapierClient::new(url, config.email.timeout())),
        })
    }
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, anyhow::Error> {
        let clients = ServiceClients::from_settings(&config)?;
        Self::build_with_clients(config, clients).await
    }

    /// Like [`Application::build`], but talking to the given service clients.
    pub async fn build_with_clients(
        config: Settings,
        clients: ServiceClients,
    ) -> Result<Self, anyhow::Error> {
        let connection_pool = get_connection_pool(&config.database);

        let contact_recipient = config
            .contact
            .recipient()
            .map_err(|e| anyhow::anyhow!(e))
            .context("Invalid contact recipient.")?;

        let site = SiteSettings {
            base_url: ApplicationBaseUrl(config.application.base_url.clone()),
            contact_recipient: ContactRecipient(contact_recipient),
            payment_catalog: PaymentCatalog::from(&config.payment),
            newsletter_admins: NewsletterAdmins(config.newsletter.admin_emails.clone()),
        };

        let templates = Tera::new("templates/**/*").context("Failed to load templates.")?;

        let address = (config.application.host.as_str(), config.application.port);
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();

        let server = run(listener, connection_pool, clients, site, templates)?;

        Ok(Self { port, server })
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn get_connection_pool(config: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new().connect_lazy_with(config.with_db())
}

pub fn run(
    listener: TcpListener,
    database: PgPool,
    clients: ServiceClients,
    site: SiteSettings,
    templates: Tera,
) -> Result<Server, std::io::Error> {
    let database = web::Data::new(database);
    let email_client = web::Data::new(clients.email);
    let auth_client = web::Data::new(clients.auth);
    let payment_client = web::Data::new(clients.payment);
    let notion_client = web::Data::new(clients.notion);
    let zapier_client = web::Data::new(clients.zapier);
    let base_url = web::Data::new(site.base_url);
    let contact_recipient = web::Data::new(site.contact_recipient);
    let payment_catalog = web::Data::new(site.payment_catalog);
    let newsletter_admins = web::Data::new(site.newsletter_admins);
    let tera = web::Data::new(templates);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(routes::cors_headers())
            .wrap(TracingLogger::default())
            .service(
                web::resource("/{tail:.*}")
                    .guard(guard::Options())
                    .to(routes::preflight),
            )
            .route("/healthz", web::get().to(routes::health_check))
            .route("/increment-visits", web::post().to(routes::increment_visits))
            .route("/subscribe", web::post().to(routes::subscribe))
            .route(
                "/send-newsletter-confirmation",
                web::post().to(routes::send_newsletter_confirmation),
            )
            .route("/confirm-newsletter", web::get().to(routes::confirm))
            .route("/unsubscribe", web::get().to(routes::unsubscribe))
            .route("/post-newsletter", web::post().to(routes::post_newsletter))
            .route("/create-payment", web::post().to(routes::create_payment))
            .route(
                "/create-subscription",
                web::post().to(routes::create_subscription),
            )
            .route("/send-contact-form", web::post().to(routes::send_contact_form))
            .route("/submit-to-notion", web::post().to(routes::submit_to_notion))
            .service(
                web::resource("/{tail:.*}")
                    .guard(guard::Get())
                    .to(routes::localized_page),
            )
            .app_data(database.clone())
            .app_data(email_client.clone())
            .app_data(auth_client.clone())
            .app_data(payment_client.clone())
            .app_data(notion_client.clone())
            .app_data(zapier_client.clone())
            .app_data(base_url.clone())
            .app_data(contact_recipient.clone())
            .app_data(payment_catalog.clone())
            .app_data(newsletter_admins.clone())
            .app_data(tera.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
