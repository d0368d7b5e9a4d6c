//! [`Command`] definition.

pub mod activate_rental;
pub mod cancel_rental;
pub mod change_vehicle_branch;
pub mod change_vehicle_status;
pub mod complete_rental;
pub mod create_rental;
pub mod issue_leasing_invoice;
pub mod quote_leasing;
pub mod quote_rental;
pub mod record_leasing_km;
pub mod request_early_termination;
pub mod reserve_rental;
pub mod start_rental_return;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    activate_rental::ActivateRental, cancel_rental::CancelRental,
    change_vehicle_branch::ChangeVehicleBranch,
    change_vehicle_status::ChangeVehicleStatus,
    complete_rental::CompleteRental, create_rental::CreateRental,
    issue_leasing_invoice::IssueLeasingInvoice, quote_leasing::QuoteLeasing,
    quote_rental::QuoteRental, record_leasing_km::RecordLeasingKm,
    request_early_termination::RequestEarlyTermination,
    reserve_rental::ReserveRental, start_rental_return::StartRentalReturn,
};

#[cfg(all(test, feature = "in-memory"))]
mod spec {
    use std::time::Duration;

    use common::{operations::Insert, Currency, Money, Percent};
    use time::{Date, Month};

    use crate::{
        domain::{
            branch, category, contract,
            customer,
            leasing::Period,
            pricing::{
                km_package, term_discount, Discount, KmPackage, TermDiscount,
            },
            rental, vehicle, Category, CustomerContract, Vehicle,
        },
        infra::database::InMemory,
        pricing::Source,
        task, Config, Service,
    };

    use super::{
        issue_leasing_invoice, record_leasing_km, request_early_termination,
        ActivateRental,
        CancelRental, Command as _, CompleteRental, CreateRental,
        IssueLeasingInvoice, QuoteLeasing, QuoteRental, RecordLeasingKm,
        RequestEarlyTermination, ReserveRental, StartRentalReturn,
    };

    fn lira(s: &str) -> Money {
        Money::new(s.parse().unwrap(), Currency::Try)
    }

    fn date(year: i32, month: Month, day: u8) -> Date {
        Date::from_calendar_date(year, month, day).unwrap()
    }

    fn service() -> Service<InMemory> {
        let config = Config {
            mark_overdue_rentals: task::mark_overdue_rentals::Config {
                interval: Duration::from_secs(60),
            },
        };
        let (svc, _bg) = Service::new(config, InMemory::default());
        svc
    }

    async fn seed_fleet(svc: &Service<InMemory>) -> (Vehicle, Category) {
        let category = Category {
            id: category::Id::new(),
            name: "Economy".parse().unwrap(),
            default_daily_price: lira("800"),
        };
        let vehicle = Vehicle {
            id: vehicle::Id::new(),
            plate_number: "34 ABC 123".parse().unwrap(),
            vin: "WVWZZZ1KZAW000001".parse().unwrap(),
            category_id: category.id,
            branch_id: branch::Id::new(),
            status: vehicle::Status::Available,
            odometer_km: 10_000,
            daily_price: Some(lira("1000")),
            weekly_price: None,
            monthly_price: None,
            created_at: vehicle::CreationDateTime::now(),
        };
        svc.database()
            .execute(Insert(category.clone()))
            .await
            .unwrap();
        svc.database()
            .execute(Insert(vehicle.clone()))
            .await
            .unwrap();
        (vehicle, category)
    }

    async fn seed_contract(
        svc: &Service<InMemory>,
        category_id: category::Id,
    ) -> CustomerContract {
        let contract = CustomerContract {
            id: contract::Id::new(),
            customer_id: customer::Id::new(),
            category_id,
            monthly_price: lira("20000"),
            included_km_per_month: 2_000,
            extra_km_price: lira("2"),
            term_months: 12,
            starts_on: date(2026, Month::January, 1),
            ends_on: date(2026, Month::December, 31),
            status: contract::Status::Active,
            created_at: contract::CreationDateTime::now(),
        };
        svc.database()
            .execute(Insert(contract.clone()))
            .await
            .unwrap();
        contract
    }

    #[tokio::test]
    async fn rental_lifecycle_with_extra_km_charge() {
        let svc = service();
        let (vehicle, _) = seed_fleet(&svc).await;
        svc.database()
            .execute(Insert(KmPackage {
                id: km_package::Id::new(),
                included_km: 300,
                extra_km_price: lira("2"),
                unlimited: false,
                applicable_rental_kinds: vec![rental::Kind::Daily],
                active: true,
            }))
            .await
            .unwrap();

        let quote = svc
            .execute(QuoteRental {
                vehicle_id: vehicle.id,
                customer_id: None,
                kind: rental::Kind::Daily,
                starts_on: date(2026, Month::March, 1),
                ends_on: date(2026, Month::March, 5),
                total_days: None,
            })
            .await
            .unwrap();
        assert_eq!(quote.total_days, 5);
        assert_eq!(quote.total_price, lira("5000"));
        assert_eq!(quote.source, Source::Daily);

        let rental = svc
            .execute(CreateRental {
                vehicle_id: vehicle.id,
                customer_id: customer::Id::new(),
                pickup_branch_id: vehicle.branch_id,
                return_branch_id: vehicle.branch_id,
                kind: rental::Kind::Daily,
                starts_on: date(2026, Month::March, 1),
                ends_on: date(2026, Month::March, 5),
                daily_price: quote.daily_price,
                total_price: quote.total_price,
                discount_amount: Money::zero(Currency::Try),
            })
            .await
            .unwrap();
        assert_eq!(rental.status, rental::Status::Draft);

        let rental =
            svc.execute(ReserveRental { id: rental.id }).await.unwrap();
        assert_eq!(rental.status, rental::Status::Reserved);

        let rental = svc
            .execute(ActivateRental {
                id: rental.id,
                start_km: 10_000,
            })
            .await
            .unwrap();
        assert_eq!(rental.status, rental::Status::Active);
        assert_eq!(rental.start_km, Some(10_000));

        let rental = svc
            .execute(StartRentalReturn { id: rental.id })
            .await
            .unwrap();
        assert_eq!(rental.status, rental::Status::ReturnPending);

        // 400 km driven against a 300 km allowance at 2 TRY each.
        let rental = svc
            .execute(CompleteRental {
                id: rental.id,
                end_km: 10_400,
            })
            .await
            .unwrap();
        assert_eq!(rental.status, rental::Status::Closed);
        assert_eq!(rental.end_km, Some(10_400));
        assert_eq!(rental.extra_km_charge, Some(lira("200")));

        let vehicle = svc
            .database()
            .execute(common::operations::Select(
                common::operations::By::<Option<Vehicle>, _>::new(vehicle.id),
            ))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(vehicle.status, vehicle::Status::Available);
        assert_eq!(vehicle.odometer_km, 10_400);
    }

    #[tokio::test]
    async fn cancelling_reserved_rental_releases_vehicle() {
        let svc = service();
        let (vehicle, _) = seed_fleet(&svc).await;

        let rental = svc
            .execute(CreateRental {
                vehicle_id: vehicle.id,
                customer_id: customer::Id::new(),
                pickup_branch_id: vehicle.branch_id,
                return_branch_id: vehicle.branch_id,
                kind: rental::Kind::Daily,
                starts_on: date(2026, Month::March, 1),
                ends_on: date(2026, Month::March, 3),
                daily_price: lira("1000"),
                total_price: lira("3000"),
                discount_amount: Money::zero(Currency::Try),
            })
            .await
            .unwrap();
        _ = svc.execute(ReserveRental { id: rental.id }).await.unwrap();

        let rental =
            svc.execute(CancelRental { id: rental.id }).await.unwrap();
        assert_eq!(rental.status, rental::Status::Cancelled);

        let vehicle = svc
            .database()
            .execute(common::operations::Select(
                common::operations::By::<Option<Vehicle>, _>::new(vehicle.id),
            ))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(vehicle.status, vehicle::Status::Available);
    }

    #[tokio::test]
    async fn leasing_quote_falls_back_to_category_default() {
        let svc = service();
        let (mut vehicle, _) = seed_fleet(&svc).await;
        vehicle.daily_price = None;
        svc.database()
            .execute(common::operations::Update(vehicle.clone()))
            .await
            .unwrap();

        let quote = svc
            .execute(QuoteLeasing {
                vehicle_id: vehicle.id,
                customer_id: None,
                starts_on: date(2026, Month::January, 1),
                ends_on: date(2027, Month::December, 31),
                term_months: Some(24),
            })
            .await
            .unwrap();
        // 800 a day, 30-day months, 24 months.
        assert_eq!(quote.net_price, lira("576000"));
        assert_eq!(quote.monthly_price, lira("24000"));
        assert_eq!(quote.source, Source::CategoryDefault);
        assert_eq!(quote.included_km_per_month, 0);
    }

    #[tokio::test]
    async fn monthly_quote_honors_the_customer_contract() {
        let svc = service();
        let (vehicle, category) = seed_fleet(&svc).await;
        let contract = seed_contract(&svc, category.id).await;

        // 3 calendar months at the negotiated 20000 a month, not the
        // category default.
        let quote = svc
            .execute(QuoteRental {
                vehicle_id: vehicle.id,
                customer_id: Some(contract.customer_id),
                kind: rental::Kind::Monthly,
                starts_on: date(2026, Month::March, 1),
                ends_on: date(2026, Month::June, 1),
                total_days: None,
            })
            .await
            .unwrap();
        assert_eq!(quote.total_price, lira("60000"));
        assert_eq!(quote.source, Source::CustomerContract);

        // An unknown customer falls through to the regular chain.
        let quote = svc
            .execute(QuoteRental {
                vehicle_id: vehicle.id,
                customer_id: Some(customer::Id::new()),
                kind: rental::Kind::Monthly,
                starts_on: date(2026, Month::March, 1),
                ends_on: date(2026, Month::June, 1),
                total_days: None,
            })
            .await
            .unwrap();
        assert_ne!(quote.source, Source::CustomerContract);
    }

    #[tokio::test]
    async fn km_capture_rolls_over_and_bills_excess() {
        use record_leasing_km::ExecutionError as E;

        let svc = service();
        let (_, category) = seed_fleet(&svc).await;
        let contract = seed_contract(&svc, category.id).await;

        // January: 1500 of 2000 km used, 500 roll over.
        let record = svc
            .execute(RecordLeasingKm {
                contract_id: contract.id,
                period: Period::new(2026, Month::January),
                current_odometer_km: 51_500,
                baseline_odometer_km: Some(50_000),
            })
            .await
            .unwrap();
        assert_eq!(record.used_km, 1_500);
        assert_eq!(record.excess_km, 0);
        assert_eq!(record.rollover_out_km, 500);

        // The same period cannot be captured twice.
        let err = svc
            .execute(RecordLeasingKm {
                contract_id: contract.id,
                period: Period::new(2026, Month::January),
                current_odometer_km: 51_600,
                baseline_odometer_km: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            E::PeriodAlreadyRecorded(p) if *p == Period::new(2026, Month::January),
        ));

        // February: 2900 km against 2000 + 500 rolled over, 400 excess.
        let record = svc
            .execute(RecordLeasingKm {
                contract_id: contract.id,
                period: Period::new(2026, Month::February),
                current_odometer_km: 54_400,
                baseline_odometer_km: None,
            })
            .await
            .unwrap();
        assert_eq!(record.rollover_in_km, 500);
        assert_eq!(record.excess_km, 400);
        assert_eq!(record.rollover_out_km, 0);

        // 20000 monthly plus 400 excess km at 2 TRY each.
        let invoice = svc
            .execute(IssueLeasingInvoice {
                contract_id: contract.id,
                period: Period::new(2026, Month::February),
            })
            .await
            .unwrap();
        assert_eq!(invoice.base_amount, lira("20000"));
        assert_eq!(invoice.extra_km_amount, lira("800"));
        assert_eq!(invoice.total_amount, lira("20800"));
    }

    #[tokio::test]
    async fn invoice_bills_the_discounted_monthly_net() {
        use issue_leasing_invoice::ExecutionError as E;

        let svc = service();
        let (_, category) = seed_fleet(&svc).await;
        let contract = seed_contract(&svc, category.id).await;
        svc.database()
            .execute(Insert(TermDiscount {
                id: term_discount::Id::new(),
                category_id: Some(category.id),
                term_months: 12,
                discount: Discount::Percentage(
                    Percent::new("10".parse().unwrap()).unwrap(),
                ),
                active: true,
            }))
            .await
            .unwrap();

        // 2400 km against a 2000 km allowance, 400 excess at 2 TRY each.
        _ = svc
            .execute(RecordLeasingKm {
                contract_id: contract.id,
                period: Period::new(2026, Month::January),
                current_odometer_km: 52_400,
                baseline_odometer_km: Some(50_000),
            })
            .await
            .unwrap();

        // 240000 for the term minus 10% is 216000, so 18000 a month.
        let invoice = svc
            .execute(IssueLeasingInvoice {
                contract_id: contract.id,
                period: Period::new(2026, Month::January),
            })
            .await
            .unwrap();
        assert_eq!(invoice.base_amount, lira("18000"));
        assert_eq!(invoice.extra_km_amount, lira("800"));
        assert_eq!(invoice.total_amount, lira("18800"));

        // Periods outside the contract's term cannot be billed.
        let err = svc
            .execute(IssueLeasingInvoice {
                contract_id: contract.id,
                period: Period::new(2027, Month::January),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            E::PeriodOutsideTerm(p) if *p == Period::new(2027, Month::January),
        ));
    }

    #[tokio::test]
    async fn second_open_termination_request_is_a_conflict() {
        use request_early_termination::ExecutionError as E;

        let svc = service();
        let (_, category) = seed_fleet(&svc).await;
        let contract = seed_contract(&svc, category.id).await;

        let first = svc
            .execute(RequestEarlyTermination {
                contract_id: contract.id,
                reason: Some("switching to a bigger fleet".into()),
            })
            .await
            .unwrap();
        assert!(first.is_open());

        let err = svc
            .execute(RequestEarlyTermination {
                contract_id: contract.id,
                reason: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            E::AlreadyRequested(id) if *id == first.id,
        ));
    }
}
