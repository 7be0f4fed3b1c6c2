use std::fmt::Write as _;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};

use crate::domain::availability::MAX_STAY_NIGHTS;
use crate::domain::booking::BookingStatus;
use crate::domain::listing::ListingRef;
use crate::domain::pricing::{format_money, format_percent};
use crate::domain::search::SearchFilters;
use crate::error::StayError;
use crate::service::StayService;

// ---------- Tool parameter types ----------

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct SearchToolParams {
    /// City to search (case-insensitive partial match, e.g. "Lisbon", "lis")
    pub location: Option<String>,
    /// Check-in date (YYYY-MM-DD). Must be paired with check_out.
    pub check_in: Option<String>,
    /// Check-out date (YYYY-MM-DD). Must be paired with check_in.
    pub check_out: Option<String>,
    /// Number of guests the listing must accommodate
    pub guests: Option<u32>,
    /// Minimum base price per night
    pub min_price: Option<u32>,
    /// Maximum base price per night
    pub max_price: Option<u32>,
    /// Property type (apartment, house, villa, studio, loft)
    pub property_type: Option<String>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ListingToolParams {
    /// Listing ID from stay_search. Either id or slug is required.
    pub id: Option<String>,
    /// Listing slug from stay_search. Either id or slug is required.
    pub slug: Option<String>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct AvailabilityToolParams {
    /// Listing ID. Either id or slug is required.
    pub id: Option<String>,
    /// Listing slug. Either id or slug is required.
    pub slug: Option<String>,
    /// First date to show (YYYY-MM-DD)
    pub from: String,
    /// Day after the last date to show (YYYY-MM-DD)
    pub to: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct QuoteToolParams {
    /// Listing ID. Either id or slug is required.
    pub id: Option<String>,
    /// Listing slug. Either id or slug is required.
    pub slug: Option<String>,
    /// Check-in date (YYYY-MM-DD)
    pub check_in: Option<String>,
    /// Check-out date (YYYY-MM-DD), exclusive
    pub check_out: Option<String>,
    /// Number of guests (default: 1)
    pub guests: Option<u32>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct BookToolParams {
    /// Listing ID. Either id or slug is required.
    pub id: Option<String>,
    /// Listing slug. Either id or slug is required.
    pub slug: Option<String>,
    /// Check-in date (YYYY-MM-DD)
    pub check_in: String,
    /// Check-out date (YYYY-MM-DD), exclusive
    pub check_out: String,
    /// Number of guests (default: 1)
    pub guests: Option<u32>,
    /// Profile ID of the guest making the booking
    pub guest_id: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct UpdateBookingToolParams {
    /// Booking ID returned by stay_book
    pub booking_id: String,
    /// New status: CONFIRMED, DECLINED or CANCELLED
    pub status: String,
}

// ---------- Helpers ----------

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid {field} date '{value}', expected YYYY-MM-DD"))
}

fn parse_optional_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, String> {
    value.map(|v| parse_date(field, v)).transpose()
}

fn listing_ref(id: Option<String>, slug: Option<String>) -> Result<ListingRef, String> {
    match (id, slug) {
        (Some(id), _) if !id.trim().is_empty() => Ok(ListingRef::Id(id)),
        (_, Some(slug)) if !slug.trim().is_empty() => Ok(ListingRef::Slug(slug)),
        _ => Err("either id or slug is required".into()),
    }
}

fn invalid_input(message: String) -> CallToolResult {
    CallToolResult::error(vec![Content::text(message)])
}

fn failure(action: &str, error: &StayError) -> CallToolResult {
    let hint = match error {
        StayError::Rejected(rejection) => format!(" (reason: {})", rejection.code()),
        StayError::Conflict { .. } => {
            " Re-check dates with stay_availability before trying again.".to_string()
        }
        StayError::ListingNotFound { .. } => " Use stay_search to find valid listings.".to_string(),
        _ => String::new(),
    };
    CallToolResult::error(vec![Content::text(format!("{action} failed: {error}.{hint}"))])
}

#[derive(Clone)]
pub struct StayMcpServer {
    service: Arc<StayService>,
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for StayMcpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StayMcpServer").finish_non_exhaustive()
    }
}

#[tool_router]
impl StayMcpServer {
    pub fn new(service: Arc<StayService>) -> Self {
        Self {
            service,
            tool_router: Self::tool_router(),
        }
    }

    /// Search listings by city, capacity, price and type; with dates, only
    /// listings free for every night are returned.
    #[tool(
        name = "stay_search",
        description = "Search vacation rentals by city, guest count, price range and property type. When check_in and check_out are given, only listings available for every night are returned. Use this first to get listing IDs.",
        annotations(read_only_hint = true, open_world_hint = false)
    )]
    async fn stay_search(
        &self,
        Parameters(params): Parameters<SearchToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let check_in = match parse_optional_date("check_in", params.check_in.as_deref()) {
            Ok(d) => d,
            Err(msg) => return Ok(invalid_input(msg)),
        };
        let check_out = match parse_optional_date("check_out", params.check_out.as_deref()) {
            Ok(d) => d,
            Err(msg) => return Ok(invalid_input(msg)),
        };
        let filters = SearchFilters {
            location: params.location,
            check_in,
            check_out,
            guests: params.guests,
            min_price: params.min_price.map(Decimal::from),
            max_price: params.max_price.map(Decimal::from),
            property_type: params.property_type,
        };

        match self.service.search(&filters).await {
            Ok(listings) => {
                let mut text = String::new();
                if listings.is_empty() {
                    text.push_str("No properties found matching your criteria.\n");
                } else {
                    let _ = writeln!(text, "Found {} available properties:\n", listings.len());
                    for (i, listing) in listings.iter().enumerate() {
                        let _ = write!(
                            text,
                            "{}. **{}** (ID: {}, slug: {})\n   {}, {} | {} | up to {} guests\n   €{}/night + €{} cleaning",
                            i + 1,
                            listing.title,
                            listing.id,
                            listing.slug,
                            listing.city,
                            listing.country,
                            listing.property_type,
                            listing.max_guests,
                            format_money(listing.base_price),
                            format_money(listing.cleaning_fee),
                        );
                        if let Some(rating) = listing.rating_avg {
                            let _ = write!(text, " | Rating: {rating:.1} ({} reviews)", listing.rating_count);
                        }
                        if listing.host_approval_required {
                            text.push_str(" | Host approval required");
                        }
                        text.push_str("\n\n");
                    }
                }
                Ok(CallToolResult::success(vec![Content::text(text)]))
            }
            Err(e) => Ok(failure("Search", &e)),
        }
    }

    #[tool(
        name = "stay_listing_details",
        description = "Get a listing's terms: base nightly price, cleaning fee, capacity and whether bookings need host approval. Requires an id or slug from stay_search.",
        annotations(read_only_hint = true, open_world_hint = false)
    )]
    async fn stay_listing_details(
        &self,
        Parameters(params): Parameters<ListingToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let listing = match listing_ref(params.id, params.slug) {
            Ok(r) => r,
            Err(msg) => return Ok(invalid_input(msg)),
        };
        match self.service.listing(&listing).await {
            Ok(found) => Ok(CallToolResult::success(vec![Content::text(found.to_string())])),
            Err(e) => Ok(failure("Listing lookup", &e)),
        }
    }

    #[tool(
        name = "stay_availability",
        description = "Show per-date availability (OPEN, BLOCKED, BOOKED) and nightly price overrides for a listing between two dates. Dates without a record are open at the base price.",
        annotations(read_only_hint = true, open_world_hint = false)
    )]
    async fn stay_availability(
        &self,
        Parameters(params): Parameters<AvailabilityToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let listing = match listing_ref(params.id, params.slug) {
            Ok(r) => r,
            Err(msg) => return Ok(invalid_input(msg)),
        };
        let (from, to) = match (parse_date("from", &params.from), parse_date("to", &params.to)) {
            (Ok(from), Ok(to)) => (from, to),
            (Err(msg), _) | (_, Err(msg)) => return Ok(invalid_input(msg)),
        };
        match self.service.availability(&listing, from, to).await {
            Ok((found, snapshot)) => {
                let mut text = format!(
                    "Availability for {} from {from} to {to} (base price €{}/night)\n",
                    found.title,
                    format_money(found.base_price)
                );
                if snapshot.is_empty() {
                    text.push_str("All dates are open at the base price.\n");
                } else {
                    text.push_str(&snapshot.to_string());
                }
                Ok(CallToolResult::success(vec![Content::text(text)]))
            }
            Err(e) => Ok(failure("Availability lookup", &e)),
        }
    }

    #[tool(
        name = "stay_quote",
        description = "Check whether a stay can be booked and compute its price breakdown: nightly subtotal (with per-date overrides), cleaning fee, service fee, taxes and total. Fee rates and the minimum stay are listed in the server instructions.",
        annotations(read_only_hint = true, open_world_hint = false)
    )]
    async fn stay_quote(
        &self,
        Parameters(params): Parameters<QuoteToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let listing = match listing_ref(params.id, params.slug) {
            Ok(r) => r,
            Err(msg) => return Ok(invalid_input(msg)),
        };
        let dates = parse_optional_date("check_in", params.check_in.as_deref()).and_then(|ci| {
            parse_optional_date("check_out", params.check_out.as_deref()).map(|co| (ci, co))
        });
        let (check_in, check_out) = match dates {
            Ok(d) => d,
            Err(msg) => return Ok(invalid_input(msg)),
        };
        match self
            .service
            .quote(&listing, check_in, check_out, params.guests.unwrap_or(1))
            .await
        {
            Ok(quote) => Ok(CallToolResult::success(vec![Content::text(quote.to_string())])),
            Err(e) => Ok(failure("Quote", &e)),
        }
    }

    #[tool(
        name = "stay_book",
        description = "Book a stay for a guest. Availability is re-checked at write time; if another booking took the dates first the call fails and new dates must be chosen. Listings that require host approval create a PENDING booking, others are CONFIRMED immediately.",
        annotations(read_only_hint = false, destructive_hint = false, open_world_hint = false)
    )]
    async fn stay_book(
        &self,
        Parameters(params): Parameters<BookToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let listing = match listing_ref(params.id, params.slug) {
            Ok(r) => r,
            Err(msg) => return Ok(invalid_input(msg)),
        };
        let (check_in, check_out) = match (
            parse_date("check_in", &params.check_in),
            parse_date("check_out", &params.check_out),
        ) {
            (Ok(ci), Ok(co)) => (ci, co),
            (Err(msg), _) | (_, Err(msg)) => return Ok(invalid_input(msg)),
        };
        match self
            .service
            .book(
                &listing,
                check_in,
                check_out,
                params.guests.unwrap_or(1),
                &params.guest_id,
            )
            .await
        {
            Ok((quote, receipt)) => {
                let mut text = format!("Booking {} is {}.\n\n{quote}\n", receipt.id, receipt.status);
                if receipt.status == BookingStatus::Pending {
                    text.push_str("\nThe booking request has been sent to the host.");
                } else {
                    text.push_str("\nThe booking is confirmed!");
                }
                Ok(CallToolResult::success(vec![Content::text(text)]))
            }
            Err(e) => Ok(failure("Booking", &e)),
        }
    }

    #[tool(
        name = "stay_update_booking",
        description = "Change a booking's status. PENDING bookings can be CONFIRMED or DECLINED by the host; PENDING or CONFIRMED bookings can be CANCELLED. Declined and cancelled bookings release their dates.",
        annotations(read_only_hint = false, destructive_hint = true, open_world_hint = false)
    )]
    async fn stay_update_booking(
        &self,
        Parameters(params): Parameters<UpdateBookingToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let Some(status) = BookingStatus::parse(&params.status) else {
            return Ok(invalid_input(format!(
                "unknown status '{}', expected CONFIRMED, DECLINED or CANCELLED",
                params.status
            )));
        };
        match self
            .service
            .update_booking_status(&params.booking_id, status)
            .await
        {
            Ok(receipt) => Ok(CallToolResult::success(vec![Content::text(format!(
                "Booking {} is now {}.",
                receipt.id, receipt.status
            ))])),
            Err(e) => Ok(failure("Status update", &e)),
        }
    }
}

impl StayMcpServer {
    fn instructions(&self) -> String {
        let fees = self.service.fees();
        let min_nights = self.service.policy().min_nights;
        format!(
            "Vacation-rental booking server.\n\
             \n\
             ## Tools\n\
             - stay_search: find listings by city, guests, price and type; pass dates to see only free listings\n\
             - stay_listing_details: base price, cleaning fee, capacity, host approval flag\n\
             - stay_availability: per-date OPEN/BLOCKED/BOOKED status and price overrides\n\
             - stay_quote: validate a stay and compute subtotal, fees, taxes and total\n\
             - stay_book: create the booking (PENDING when the host must approve, else CONFIRMED)\n\
             - stay_update_booking: confirm, decline or cancel a booking\n\
             \n\
             ## Rules\n\
             - Minimum stay is {min_nights} night(s), maximum {MAX_STAY_NIGHTS}; check-out is exclusive.\n\
             - Service fee is {service} and taxes are {taxes} of the nightly subtotal, each rounded to cents.\n\
             - Past dates and BLOCKED or BOOKED nights cannot be booked.\n\
             - If stay_book reports the dates are no longer available, pick new dates and quote again.",
            service = format_percent(fees.service_fee_rate),
            taxes = format_percent(fees.tax_rate),
        )
    }
}

#[tool_handler]
impl ServerHandler for StayMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(self.instructions()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::FixedClock;
    use crate::adapters::memory_store::InMemoryStore;
    use crate::domain::availability::AvailabilityStatus;
    use crate::domain::pricing::FeeSchedule;
    use crate::domain::validation::StayPolicy;
    use crate::ports::availability_store::AvailabilityStore;
    use crate::ports::booking_store::BookingStore;
    use crate::ports::listing_repository::ListingRepository;
    use crate::test_helpers::{date, dec, make_listing};

    fn extract_text(result: &CallToolResult) -> &str {
        result.content[0]
            .raw
            .as_text()
            .expect("expected text content")
            .text
            .as_str()
    }

    async fn make_server() -> (Arc<InMemoryStore>, StayMcpServer) {
        let store = Arc::new(InMemoryStore::new());
        store.insert_listing(make_listing("l-1", 100)).await;
        let mut approval = make_listing("l-2", 80);
        approval.host_approval_required = true;
        store.insert_listing(approval).await;
        let service = StayService::new(
            Arc::clone(&store) as Arc<dyn ListingRepository>,
            Arc::clone(&store) as Arc<dyn AvailabilityStore>,
            Arc::clone(&store) as Arc<dyn BookingStore>,
            Arc::new(FixedClock(date("2025-05-01"))),
        );
        (store, StayMcpServer::new(Arc::new(service)))
    }

    fn quote_params(id: &str, check_in: &str, check_out: &str) -> QuoteToolParams {
        QuoteToolParams {
            id: Some(id.into()),
            slug: None,
            check_in: Some(check_in.into()),
            check_out: Some(check_out.into()),
            guests: Some(2),
        }
    }

    fn book_params(id: &str, check_in: &str, check_out: &str) -> BookToolParams {
        BookToolParams {
            id: Some(id.into()),
            slug: None,
            check_in: check_in.into(),
            check_out: check_out.into(),
            guests: Some(2),
            guest_id: "guest-1".into(),
        }
    }

    #[tokio::test]
    async fn search_lists_listings_by_price() {
        let (_store, server) = make_server().await;
        let result = server
            .stay_search(Parameters(SearchToolParams {
                location: Some("lisbon".into()),
                check_in: None,
                check_out: None,
                guests: None,
                min_price: None,
                max_price: None,
                property_type: None,
            }))
            .await
            .unwrap();
        let text = extract_text(&result);
        assert!(text.contains("Found 2 available properties"));
        let cheap = text.find("Listing l-2").unwrap();
        let pricey = text.find("Listing l-1").unwrap();
        assert!(cheap < pricey);
        assert!(text.contains("Host approval required"));
    }

    #[tokio::test]
    async fn search_rejects_malformed_date() {
        let (_store, server) = make_server().await;
        let result = server
            .stay_search(Parameters(SearchToolParams {
                location: None,
                check_in: Some("06/01/2025".into()),
                check_out: Some("2025-06-04".into()),
                guests: None,
                min_price: None,
                max_price: None,
                property_type: None,
            }))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(extract_text(&result).contains("expected YYYY-MM-DD"));
    }

    #[tokio::test]
    async fn search_with_no_match() {
        let (_store, server) = make_server().await;
        let result = server
            .stay_search(Parameters(SearchToolParams {
                location: Some("Tokyo".into()),
                check_in: None,
                check_out: None,
                guests: None,
                min_price: None,
                max_price: None,
                property_type: None,
            }))
            .await
            .unwrap();
        assert!(extract_text(&result).contains("No properties found"));
    }

    #[tokio::test]
    async fn listing_details_by_slug() {
        let (_store, server) = make_server().await;
        let result = server
            .stay_listing_details(Parameters(ListingToolParams {
                id: None,
                slug: Some("listing-l-2".into()),
            }))
            .await
            .unwrap();
        let text = extract_text(&result);
        assert!(text.contains("# Listing l-2"));
        assert!(text.contains("require host approval"));
    }

    #[tokio::test]
    async fn listing_details_requires_reference() {
        let (_store, server) = make_server().await;
        let result = server
            .stay_listing_details(Parameters(ListingToolParams {
                id: None,
                slug: None,
            }))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(extract_text(&result).contains("either id or slug"));
    }

    #[tokio::test]
    async fn listing_details_unknown_id() {
        let (_store, server) = make_server().await;
        let result = server
            .stay_listing_details(Parameters(ListingToolParams {
                id: Some("ghost".into()),
                slug: None,
            }))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(extract_text(&result).contains("stay_search"));
    }

    #[tokio::test]
    async fn availability_shows_records() {
        let (store, server) = make_server().await;
        store
            .set_date_status("l-1", date("2025-06-02"), AvailabilityStatus::Blocked)
            .await
            .unwrap();
        let result = server
            .stay_availability(Parameters(AvailabilityToolParams {
                id: Some("l-1".into()),
                slug: None,
                from: "2025-06-01".into(),
                to: "2025-06-05".into(),
            }))
            .await
            .unwrap();
        let text = extract_text(&result);
        assert!(text.contains("2025-06-02"));
        assert!(text.contains("BLOCKED"));
    }

    #[tokio::test]
    async fn availability_all_open() {
        let (_store, server) = make_server().await;
        let result = server
            .stay_availability(Parameters(AvailabilityToolParams {
                id: Some("l-1".into()),
                slug: None,
                from: "2025-06-01".into(),
                to: "2025-06-05".into(),
            }))
            .await
            .unwrap();
        assert!(extract_text(&result).contains("All dates are open"));
    }

    #[tokio::test]
    async fn quote_returns_breakdown() {
        let (store, server) = make_server().await;
        store
            .set_price_override("l-1", date("2025-06-02"), dec("150"))
            .await
            .unwrap();
        let result = server
            .stay_quote(Parameters(quote_params("l-1", "2025-06-01", "2025-06-04")))
            .await
            .unwrap();
        let text = extract_text(&result);
        assert!(text.contains("€350.00"));
        assert!(text.contains("Service fee (12%): €42.00"));
        assert!(text.contains("Taxes (10%): €35.00"));
        assert!(text.contains("Total: €447.00"));
        assert!(text.contains("Instant booking"));
    }

    #[tokio::test]
    async fn quote_below_minimum_stay() {
        let (_store, server) = make_server().await;
        let result = server
            .stay_quote(Parameters(quote_params("l-1", "2025-06-01", "2025-06-02")))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(extract_text(&result).contains("MinimumStayNotMet"));
    }

    #[tokio::test]
    async fn quote_over_capacity() {
        let (_store, server) = make_server().await;
        let mut params = quote_params("l-1", "2025-06-01", "2025-06-04");
        params.guests = Some(9);
        let result = server.stay_quote(Parameters(params)).await.unwrap();
        assert!(extract_text(&result).contains("GuestsExceedCapacity"));
    }

    #[tokio::test]
    async fn book_then_conflicting_book() {
        let (_store, server) = make_server().await;
        let first = server
            .stay_book(Parameters(book_params("l-1", "2025-06-01", "2025-06-04")))
            .await
            .unwrap();
        assert_ne!(first.is_error, Some(true));
        assert!(extract_text(&first).contains("CONFIRMED"));

        let second = server
            .stay_book(Parameters(book_params("l-1", "2025-06-03", "2025-06-06")))
            .await
            .unwrap();
        assert_eq!(second.is_error, Some(true));
        assert!(extract_text(&second).contains("DateUnavailable"));
    }

    #[tokio::test]
    async fn book_with_zero_guests_rejected() {
        let (store, server) = make_server().await;
        let mut params = book_params("l-1", "2025-06-01", "2025-06-04");
        params.guests = Some(0);
        let result = server.stay_book(Parameters(params)).await.unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(extract_text(&result).contains("at least one guest"));
        let records = store
            .get_range("l-1", date("2025-06-01"), date("2025-06-04"))
            .await
            .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn book_pending_then_decline() {
        let (store, server) = make_server().await;
        let result = server
            .stay_book(Parameters(book_params("l-2", "2025-06-01", "2025-06-04")))
            .await
            .unwrap();
        let text = extract_text(&result);
        assert!(text.contains("PENDING"));
        assert!(text.contains("sent to the host"));

        let booking_id = text
            .strip_prefix("Booking ")
            .and_then(|rest| rest.split_whitespace().next())
            .unwrap()
            .to_string();
        let update = server
            .stay_update_booking(Parameters(UpdateBookingToolParams {
                booking_id: booking_id.clone(),
                status: "declined".into(),
            }))
            .await
            .unwrap();
        assert!(extract_text(&update).contains("DECLINED"));
        assert_eq!(
            store.get_booking(&booking_id).await.unwrap().status,
            BookingStatus::Declined
        );
    }

    #[tokio::test]
    async fn update_with_unknown_status() {
        let (_store, server) = make_server().await;
        let result = server
            .stay_update_booking(Parameters(UpdateBookingToolParams {
                booking_id: "x".into(),
                status: "ARCHIVED".into(),
            }))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(extract_text(&result).contains("unknown status"));
    }

    #[tokio::test]
    async fn update_unknown_booking() {
        let (_store, server) = make_server().await;
        let result = server
            .stay_update_booking(Parameters(UpdateBookingToolParams {
                booking_id: "missing".into(),
                status: "CANCELLED".into(),
            }))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(extract_text(&result).contains("Booking not found"));
    }

    #[test]
    fn failure_explains_conflict() {
        let result = failure(
            "Booking",
            &StayError::Conflict {
                listing_id: "l-1".into(),
                date: date("2025-06-02"),
            },
        );
        let text = extract_text(&result);
        assert!(text.contains("no longer available"));
        assert!(text.contains("stay_availability"));
    }

    #[test]
    fn listing_ref_prefers_id() {
        assert_eq!(
            listing_ref(Some("a".into()), Some("b".into())),
            Ok(ListingRef::Id("a".into()))
        );
        assert_eq!(
            listing_ref(Some(" ".into()), Some("b".into())),
            Ok(ListingRef::Slug("b".into()))
        );
    }

    #[test]
    fn get_info_lists_tools() {
        let store = Arc::new(InMemoryStore::new());
        let service = StayService::new(
            Arc::clone(&store) as Arc<dyn ListingRepository>,
            Arc::clone(&store) as Arc<dyn AvailabilityStore>,
            store as Arc<dyn BookingStore>,
            Arc::new(FixedClock(date("2025-05-01"))),
        );
        let info = StayMcpServer::new(Arc::new(service)).get_info();
        let instructions = info.instructions.unwrap();
        for tool in [
            "stay_search",
            "stay_listing_details",
            "stay_availability",
            "stay_quote",
            "stay_book",
            "stay_update_booking",
        ] {
            assert!(instructions.contains(tool), "missing {tool}");
        }
        assert!(info.capabilities.tools.is_some());
        assert!(instructions.contains("Minimum stay is 2 night(s)"));
        assert!(instructions.contains("Service fee is 12% and taxes are 10%"));
    }

    #[test]
    fn get_info_reflects_configured_rules() {
        let store = Arc::new(InMemoryStore::new());
        let service = StayService::new(
            Arc::clone(&store) as Arc<dyn ListingRepository>,
            Arc::clone(&store) as Arc<dyn AvailabilityStore>,
            store as Arc<dyn BookingStore>,
            Arc::new(FixedClock(date("2025-05-01"))),
        )
        .with_rules(
            FeeSchedule {
                service_fee_rate: dec("0.05"),
                tax_rate: dec("0.075"),
            },
            StayPolicy { min_nights: 3 },
        );
        let instructions = StayMcpServer::new(Arc::new(service))
            .get_info()
            .instructions
            .unwrap();
        assert!(instructions.contains("Minimum stay is 3 night(s)"));
        assert!(instructions.contains("Service fee is 5% and taxes are 7.5%"));
        assert!(!instructions.contains("12%"));
    }
}
