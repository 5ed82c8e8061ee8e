use tracing::trace;

/// Coalesces redraw requests between frames.
///
/// Any number of `request` calls before the next frame collapse into one
/// redraw; `take` hands it to the frame loop and clears it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RedrawRequest {
    pending: bool,
    coalesced: u64,
}

impl RedrawRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self) {
        if self.pending {
            self.coalesced += 1;
        } else {
            trace!("redraw requested");
        }
        self.pending = true;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consume the pending request, if any.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    /// Requests that were folded into an already pending redraw.
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }
}

#[cfg(test)]
mod tests {
    use super::RedrawRequest;

    #[test]
    fn repeated_requests_collapse_into_one() {
        let mut r = RedrawRequest::new();
        r.request();
        r.request();
        r.request();
        assert!(r.take());
        assert!(!r.take());
        assert_eq!(r.coalesced(), 2);
    }
}
