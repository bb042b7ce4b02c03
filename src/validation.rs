// src/validation.rs
//
// 在数据模型之外做的软约束检查。模型本身保持宽松，由接入方决定告警还是拒绝。

use thiserror::Error;
use tracing::warn;

use crate::error::{Error, Result};
use crate::openrtb::request::BidRequest;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("wseat and bseat are both set; at most one seat list should be used")]
    SeatListsBothSet,
    #[error("site and app are both present")]
    SiteAndAppBothSet,
    #[error("cur is empty")]
    EmptyCurrencyList,
    #[error("tmax is zero")]
    NonPositiveTmax,
    #[error("test flag {0} is not 0 or 1")]
    TestFlagOutOfRange(i32),
    #[error("source.fd {0} is not 0 or 1")]
    FinalDecisionOutOfRange(i32),
    #[error("regs.coppa {0} is not 0 or 1")]
    CoppaOutOfRange(i32),
    #[error("imp is not set")]
    MissingImpression,
}

fn is_flag(value: i32) -> bool {
    matches!(value, 0 | 1)
}

/// 收集所有软约束违规，全部满足时返回 `Ok(())`
pub fn check(request: &BidRequest) -> std::result::Result<(), Vec<Violation>> {
    let mut violations = Vec::new();

    if !request.wseat().is_empty() && !request.bseat().is_empty() {
        violations.push(Violation::SeatListsBothSet);
    }
    if request.site().is_some() && request.app().is_some() {
        violations.push(Violation::SiteAndAppBothSet);
    }
    if request.cur().is_empty() {
        violations.push(Violation::EmptyCurrencyList);
    }
    if request.tmax() == 0 {
        violations.push(Violation::NonPositiveTmax);
    }
    if !is_flag(request.test()) {
        violations.push(Violation::TestFlagOutOfRange(request.test()));
    }
    if let Some(source) = request.source() {
        if !is_flag(source.fd) {
            violations.push(Violation::FinalDecisionOutOfRange(source.fd));
        }
    }
    if let Some(coppa) = request.regs().and_then(|r| r.coppa) {
        if !is_flag(coppa) {
            violations.push(Violation::CoppaOutOfRange(coppa));
        }
    }
    if request.imp().is_none() {
        violations.push(Violation::MissingImpression);
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// 同 [`check`]，并把每条违规记录为 WARN 日志
pub fn check_and_log(request: &BidRequest) -> std::result::Result<(), Vec<Violation>> {
    check(request).inspect_err(|violations| {
        for violation in violations {
            warn!(request_id = %request.id(), %violation, "bid request soft constraint violated");
        }
    })
}

/// 严格模式：有任何违规即返回错误
pub fn validate_strict(request: &BidRequest) -> Result<()> {
    check_and_log(request).map_err(Error::SoftConstraintViolation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openrtb::{App, Imp, Regs, Site, Source};

    fn valid() -> BidRequest {
        let mut req = BidRequest::new("req-1", 120).unwrap();
        req.set_imp(Imp::new("1"));
        req.set_site(Site::default());
        req
    }

    #[test]
    fn valid_request_passes() {
        assert_eq!(check(&valid()), Ok(()));
        assert!(validate_strict(&valid()).is_ok());
    }

    #[test]
    fn one_seat_list_is_fine() {
        let mut req = valid();
        req.set_wseat(["seat-a"]);
        assert_eq!(check(&req), Ok(()));
    }

    #[test]
    fn reports_every_violation() {
        let mut req = BidRequest::with_auction("req-2", 0, 2, 3).unwrap();
        req.set_wseat(["seat-a"]);
        req.set_bseat(["seat-b"]);
        req.set_site(Site::default());
        req.set_app(App::default());
        req.set_cur(Vec::<String>::new());
        req.set_source(Source { fd: 2, ..Source::default() });
        req.set_regs(Regs { coppa: Some(9), ext: None });

        assert_eq!(
            check(&req),
            Err(vec![
                Violation::SeatListsBothSet,
                Violation::SiteAndAppBothSet,
                Violation::EmptyCurrencyList,
                Violation::NonPositiveTmax,
                Violation::TestFlagOutOfRange(3),
                Violation::FinalDecisionOutOfRange(2),
                Violation::CoppaOutOfRange(9),
                Violation::MissingImpression,
            ])
        );
    }

    #[test]
    fn strict_mode_wraps_violations() {
        let mut req = valid();
        req.set_app(App::default());
        let err = validate_strict(&req).unwrap_err();
        assert!(matches!(&err, Error::SoftConstraintViolation(v) if v == &[Violation::SiteAndAppBothSet]));
        assert_eq!(
            err.to_string(),
            "1 soft constraint violation(s): site and app are both present"
        );
    }

    #[test]
    fn check_does_not_modify_request() {
        let mut req = valid();
        req.set_app(App::default());
        let before = req.clone();
        let _ = check_and_log(&req);
        assert_eq!(req, before);
    }
}
