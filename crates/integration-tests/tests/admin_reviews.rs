//! Integration tests for the review browser.

#![allow(clippy::unwrap_used)]

use prifam_integration_tests::TestContext;
use reqwest::StatusCode;

async fn signed_in() -> TestContext {
    let ctx = TestContext::new().await;
    ctx.login("manager").await;
    ctx
}

#[tokio::test]
async fn test_all_reviews_listed_by_default() {
    let ctx = signed_in().await;
    let body = ctx.page("/reviews").await;
    assert!(body.contains("Showing 5 of 5 reviews"));
    for customer in ["Rahul Sharma", "Priya Mehta", "Amit Kumar", "Sneha Patel", "Vikash Singh"] {
        assert!(body.contains(customer), "{customer}");
    }
}

#[tokio::test]
async fn test_search_and_sentiment_combine() {
    let ctx = signed_in().await;
    let body = ctx.page("/reviews?search=swiggy&sentiment=negative").await;
    assert!(body.contains("Showing 1 of 5 reviews"));
    assert!(body.contains("Priya Mehta"));
    assert!(!body.contains("Vikash Singh"));
    assert!(!body.contains("Sneha Patel"));
}

#[tokio::test]
async fn test_platform_filter_and_all_sentinel() {
    let ctx = signed_in().await;
    let body = ctx.page("/reviews?platform=Zomato&sentiment=all").await;
    assert!(body.contains("Showing 2 of 5 reviews"));
    assert!(body.contains("Rahul Sharma"));
    assert!(body.contains("Amit Kumar"));

    let body = ctx.page("/reviews?search=&platform=").await;
    assert!(body.contains("Showing 5 of 5 reviews"));
}

#[tokio::test]
async fn test_unknown_sentiment_is_bad_request() {
    let ctx = signed_in().await;
    let resp = ctx.get("/reviews?sentiment=furious").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_selection_drives_detail_panel() {
    let ctx = signed_in().await;

    let body = ctx.page("/reviews").await;
    assert!(body.contains("Select a review to see its details"));
    assert!(!body.contains("We sincerely apologize for the delayed delivery"));

    let body = ctx.page("/reviews?selected=2").await;
    assert!(!body.contains("Select a review to see its details"));
    assert!(body.contains("We sincerely apologize for the delayed delivery"));

    // Rows link to their selection while keeping the active filters
    let body = ctx.page("/reviews?sentiment=negative").await;
    assert!(body.contains("/reviews?sentiment=negative&amp;selected=4"));
}

#[tokio::test]
async fn test_unknown_selection_shows_placeholder() {
    let ctx = signed_in().await;
    for selected in ["42", "abc"] {
        let body = ctx.page(&format!("/reviews?selected={selected}")).await;
        assert!(body.contains("Select a review to see its details"));
    }
}
