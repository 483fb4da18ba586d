//! Token Index Fetcher
//!
//! Enumerates every token id of a CW721 contract by paging through
//! `all_tokens`. Each page's last id becomes the next page's `start_after`;
//! the first empty page ends the walk. Ids are kept in contract order and
//! are not deduplicated.
//!
//! A misbehaving endpoint can otherwise loop forever, so the walk also stops
//! with an error when a cursor repeats or when `max_pages` is exceeded.

use std::collections::HashSet;

use super::error::FetchError;
use super::messages::{Cw721QueryMsg, TokensResponse};
use super::query::run_query;
use crate::domain::TokenId;
use crate::ports::ContractQueryPort;

/// Default `all_tokens` page size
pub const DEFAULT_PAGE_SIZE: u32 = 30;

/// Default ceiling on non-empty pages
pub const DEFAULT_MAX_PAGES: usize = 100_000;

/// Pages through a contract's token index
pub struct TokenIndexFetcher<'a, P: ContractQueryPort + ?Sized> {
    port: &'a P,
    page_size: u32,
    max_pages: usize,
}

impl<'a, P: ContractQueryPort + ?Sized> TokenIndexFetcher<'a, P> {
    pub fn new(port: &'a P) -> Self {
        Self {
            port,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Fetch one page of token ids after `start_after`
    pub async fn list_tokens(
        &self,
        contract_address: &str,
        start_after: Option<&TokenId>,
        limit: u32,
    ) -> Result<Vec<TokenId>, FetchError> {
        let msg = Cw721QueryMsg::AllTokens {
            limit,
            start_after: start_after.map(|id| id.as_str().to_string()),
        };
        let page: TokensResponse = run_query(self.port, contract_address, &msg).await?;
        Ok(page.tokens.into_iter().map(TokenId::from).collect())
    }

    /// Fetch every token id, page by page, until an empty page
    pub async fn list_all_tokens(&self, contract_address: &str) -> Result<Vec<TokenId>, FetchError> {
        let mut tokens = Vec::new();
        let mut cursor: Option<TokenId> = None;
        let mut seen_cursors: HashSet<TokenId> = HashSet::new();
        let mut pages = 0usize;

        loop {
            let page = self
                .list_tokens(contract_address, cursor.as_ref(), self.page_size)
                .await?;

            let Some(last) = page.last().cloned() else {
                break;
            };

            pages += 1;
            if pages > self.max_pages {
                return Err(FetchError::PageLimitExceeded {
                    max_pages: self.max_pages,
                });
            }
            if !seen_cursors.insert(last.clone()) {
                return Err(FetchError::PaginationStalled { cursor: last });
            }

            tracing::debug!(
                "Token index page {}: {} ids (cursor {})",
                pages,
                page.len(),
                last
            );

            tokens.extend(page);
            cursor = Some(last);
        }

        tracing::info!("Number of tokens: {}", tokens.len());
        Ok(tokens)
    }
}
