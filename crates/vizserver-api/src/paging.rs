use tracing::debug;
use vizserver_core::model::Pagination;
use vizserver_core::request_options::RequestOptions;

/// A list endpoint that can be read one page at a time.
pub trait PagedEndpoint {
    type Item;

    fn page(&self, options: &RequestOptions) -> anyhow::Result<(Vec<Self::Item>, Pagination)>;
}

/// Iterates every item of a [`PagedEndpoint`], fetching pages lazily.
///
/// Iteration stops after the page that reaches `totalAvailable`, after an
/// empty page, or after yielding a fetch error.
pub struct Pager<'e, E: PagedEndpoint> {
    endpoint: &'e E,
    next: Option<RequestOptions>,
    buffer: std::vec::IntoIter<E::Item>,
}

impl<'e, E: PagedEndpoint> Pager<'e, E> {
    pub fn new(endpoint: &'e E, options: RequestOptions) -> Self {
        Self {
            endpoint,
            next: Some(options),
            buffer: Vec::new().into_iter(),
        }
    }

    pub fn collect_all(self) -> anyhow::Result<Vec<E::Item>> {
        self.collect()
    }
}

impl<E: PagedEndpoint> Iterator for Pager<'_, E> {
    type Item = anyhow::Result<E::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.buffer.next() {
                return Some(Ok(item));
            }
            let options = self.next.take()?;
            match self.endpoint.page(&options) {
                Ok((items, pagination)) => {
                    debug!(
                        page = pagination.page_number,
                        count = items.len(),
                        total = pagination.total_available,
                        "fetched page"
                    );
                    if !items.is_empty() && pagination.has_more() {
                        self.next = Some(options.next_page());
                    }
                    self.buffer = items.into_iter();
                }
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Numbers {
        total: u32,
        fail_on_page: Option<u32>,
        requested: RefCell<Vec<u32>>,
    }

    impl Numbers {
        fn new(total: u32) -> Self {
            Self {
                total,
                fail_on_page: None,
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    impl PagedEndpoint for Numbers {
        type Item = u32;

        fn page(&self, options: &RequestOptions) -> anyhow::Result<(Vec<u32>, Pagination)> {
            self.requested.borrow_mut().push(options.page_number);
            if self.fail_on_page == Some(options.page_number) {
                anyhow::bail!("page {} unavailable", options.page_number);
            }
            let start = (options.page_number - 1) * options.page_size;
            let end = (start + options.page_size).min(self.total);
            let items = (start..end).collect();
            Ok((
                items,
                Pagination {
                    page_number: options.page_number,
                    page_size: options.page_size,
                    total_available: u64::from(self.total),
                },
            ))
        }
    }

    #[test]
    fn visits_every_item_once() {
        let endpoint = Numbers::new(7);
        let items = Pager::new(&endpoint, RequestOptions::new().page_size(3))
            .collect_all()
            .unwrap();
        assert_eq!(items, (0..7).collect::<Vec<_>>());
        assert_eq!(*endpoint.requested.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn exact_multiple_stops_without_extra_request() {
        let endpoint = Numbers::new(6);
        let items = Pager::new(&endpoint, RequestOptions::new().page_size(3))
            .collect_all()
            .unwrap();
        assert_eq!(items.len(), 6);
        assert_eq!(*endpoint.requested.borrow(), vec![1, 2]);
    }

    #[test]
    fn empty_endpoint_yields_nothing() {
        let endpoint = Numbers::new(0);
        let mut pager = Pager::new(&endpoint, RequestOptions::new());
        assert!(pager.next().is_none());
        assert_eq!(*endpoint.requested.borrow(), vec![1]);
    }

    #[test]
    fn error_is_yielded_once_then_stops() {
        let mut endpoint = Numbers::new(10);
        endpoint.fail_on_page = Some(2);
        let mut pager = Pager::new(&endpoint, RequestOptions::new().page_size(4));
        let first: Vec<u32> = pager.by_ref().take(4).map(|item| item.unwrap()).collect();
        assert_eq!(first, vec![0, 1, 2, 3]);
        assert!(pager.next().unwrap().is_err());
        assert!(pager.next().is_none());
    }

    #[test]
    fn starts_from_requested_page() {
        let endpoint = Numbers::new(10);
        let items = Pager::new(
            &endpoint,
            RequestOptions::new().page_size(4).page_number(2),
        )
        .collect_all()
        .unwrap();
        assert_eq!(items, (4..10).collect::<Vec<_>>());
    }
}
