use crate::infra::{default_metros, InMemoryBoardRepository, InMemoryRefundPublisher};
use chrono::Utc;
use clap::Args;
use coffeeboard::error::AppError;
use coffeeboard::listings::{
    BoardService, CheckoutError, CheckoutRequest, CheckoutSession, JobDraft, PaymentGateway,
};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Request pinned placement for the demo posting
    #[arg(long)]
    pub(crate) pinned: bool,
    /// Skip the rejection/refund portion of the demo
    #[arg(long)]
    pub(crate) skip_rejection: bool,
}

/// Gateway stand-in so the demo never leaves the process.
struct DemoGateway;

impl PaymentGateway for DemoGateway {
    async fn create_checkout(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutSession, CheckoutError> {
        Ok(CheckoutSession {
            url: format!(
                "https://checkout.example.test/s/{}-{}",
                request.metro_slug,
                if request.requested_pinned { "pinned" } else { "standard" }
            ),
        })
    }
}

fn demo_draft(pinned: bool) -> JobDraft {
    JobDraft {
        cafe_name: "Blue Door".to_string(),
        role: "Barista".to_string(),
        pay: "$18/hr + tips".to_string(),
        hours: "PT / 20-30 hrs/wk".to_string(),
        neighborhood: "Alberta".to_string(),
        apply_email: "hr@bluedoor.com".to_string(),
        description: "Busy neighborhood cafe, weekend availability a plus.".to_string(),
        requested_pinned: pinned,
        ..JobDraft::default()
    }
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let repository = Arc::new(InMemoryBoardRepository::default());
    let refunds = Arc::new(InMemoryRefundPublisher::default());
    let service = BoardService::new(
        default_metros(),
        repository,
        Arc::new(DemoGateway),
        refunds.clone(),
    );

    println!("Coffee job board lifecycle demo");

    let now = Utc::now();
    let (id, session) = match service.submit("portland-or", demo_draft(args.pinned), now).await {
        Ok(accepted) => accepted,
        Err(err) => {
            println!("  Submission refused: {err}");
            return Ok(());
        }
    };
    println!("- Accepted submission {id} -> redirect {}", session.url);

    let view = match service.confirm_payment(&id, Utc::now()) {
        Ok(view) => view,
        Err(err) => {
            println!("  Payment confirmation failed: {err}");
            return Ok(());
        }
    };
    println!("- Payment confirmed -> status {}", view.lifecycle);

    let view = match service.approve(&id, Utc::now()) {
        Ok(view) => view,
        Err(err) => {
            println!("  Approval failed: {err}");
            return Ok(());
        }
    };
    println!("- Operator approved -> status {}", view.lifecycle);

    match service.listings("portland-or", Utc::now()) {
        Ok(listings) => {
            println!("\nPublic board ({} listing(s))", listings.len());
            for listing in &listings {
                let badge = if listing.pinned { " [pinned]" } else { "" };
                println!(
                    "  - {} — {}{} · {}",
                    listing.role, listing.cafe_name, badge, listing.pay
                );
            }
        }
        Err(err) => println!("  Board unavailable: {err}"),
    }

    if args.skip_rejection {
        return Ok(());
    }

    println!("\nRejection branch");
    let mut declined = demo_draft(false);
    declined.cafe_name = "Talent Finders LLC".to_string();
    declined.description = "Staffing agency seeking baristas for client sites.".to_string();

    let (declined_id, _) = match service.submit("portland-or", declined, Utc::now()).await {
        Ok(accepted) => accepted,
        Err(err) => {
            println!("  Submission refused: {err}");
            return Ok(());
        }
    };
    if let Err(err) = service.confirm_payment(&declined_id, Utc::now()) {
        println!("  Payment confirmation failed: {err}");
        return Ok(());
    }
    match service.reject(&declined_id, "recruiter posting, not a cafe", Utc::now()) {
        Ok(view) => println!(
            "- Operator rejected {} -> status {} ({})",
            declined_id,
            view.lifecycle,
            view.rejection_reason.as_deref().unwrap_or("no reason recorded")
        ),
        Err(err) => {
            println!("  Rejection failed: {err}");
            return Ok(());
        }
    }

    for intent in refunds.events() {
        println!("- Refund obligation: {} ({})", intent.submission_id, intent.reason);
    }

    match service.confirm_refund(&declined_id) {
        Ok(view) => println!("- Refund confirmed -> status {}", view.lifecycle),
        Err(err) => println!("  Refund confirmation failed: {err}"),
    }

    Ok(())
}
