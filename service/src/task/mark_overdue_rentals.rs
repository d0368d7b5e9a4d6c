//! [`MarkOverdueRentals`] [`Task`].

use std::{convert::Infallible, error::Error, time::Duration};

use common::{
    operations::{By, Perform, Select, Start, Update},
    DateTime,
};
use derive_more::{Display, Error as StdError, From};
use time::Date;
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{rental, Rental},
    infra::{database, Database},
    read::rental::Overdue,
    Service,
};

use super::Task;

/// Configuration for [`MarkOverdueRentals`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between overdue [`Rental`]s sweeps.
    pub interval: Duration,
}

/// [`Task`] sweeping [`rental::Status::Active`] [`Rental`]s past their
/// agreed end date into [`rental::Status::Overdue`].
#[derive(Clone, Copy, Debug)]
pub struct MarkOverdueRentals<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db> Task<Start<By<MarkOverdueRentals<Self>, Config>>> for Service<Db>
where
    MarkOverdueRentals<Service<Db>>:
        Task<Perform<()>, Ok = (), Err: Error> + Send + Sync + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<MarkOverdueRentals<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = MarkOverdueRentals {
            config,
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            let _ = interval.tick().await;
            _ = task.execute(Perform(())).await.map_err(|e| {
                log::error!("`task::MarkOverdueRentals` failed: {e}");
            });
        }
    }
}

impl<Db> Task<Perform<()>> for MarkOverdueRentals<Service<Db>>
where
    Db: Database<
            Select<By<Vec<Overdue<Rental>>, Date>>,
            Ok = Vec<Overdue<Rental>>,
            Err = Traced<database::Error>,
        > + Database<Update<Rental>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let today = DateTime::now().date();
        let overdue = self
            .service
            .database()
            .execute(Select(By::<Vec<Overdue<Rental>>, _>::new(today)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        for Overdue(mut rental) in overdue {
            rental
                .mark_overdue()
                .map_err(tracerr::from_and_wrap!(=> E))?;
            self.service
                .database()
                .execute(Update(rental))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
        }
        Ok(())
    }
}

/// Error of [`MarkOverdueRentals`] execution.
#[derive(Debug, Display, From, StdError)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Swept [`Rental`] refused the transition.
    #[display("{_0}")]
    #[from]
    Rental(rental::TransitionError),
}

#[cfg(all(test, feature = "in-memory"))]
mod spec {
    use common::{
        operations::{By, Insert, Perform, Select},
        Currency, DateTime, Money,
    };

    use crate::{
        domain::{branch, customer, rental, vehicle, Rental},
        infra::database::InMemory,
        Config, Service,
    };

    use super::{Duration, MarkOverdueRentals, Task as _};

    fn rental(ends_on: time::Date) -> Rental {
        Rental {
            id: rental::Id::new(),
            vehicle_id: vehicle::Id::new(),
            customer_id: customer::Id::new(),
            pickup_branch_id: branch::Id::new(),
            return_branch_id: branch::Id::new(),
            kind: rental::Kind::Daily,
            starts_on: ends_on - time::Duration::days(7),
            ends_on,
            status: rental::Status::Active,
            start_km: Some(10_000),
            end_km: None,
            daily_price: Money::new("1000".parse().unwrap(), Currency::Try),
            total_price: Money::new("7000".parse().unwrap(), Currency::Try),
            discount_amount: Money::zero(Currency::Try),
            extra_km_charge: None,
            created_at: rental::CreationDateTime::now(),
            completed_at: None,
            cancelled_at: None,
        }
    }

    #[tokio::test]
    async fn sweeps_only_rentals_past_their_end_date() {
        let config = Config {
            mark_overdue_rentals: super::Config {
                interval: Duration::from_secs(60),
            },
        };
        let (svc, _bg) = Service::new(config, InMemory::default());

        let today = DateTime::now().date();
        let overdue = rental(today.previous_day().unwrap());
        let current = rental(today + time::Duration::days(3));
        svc.database()
            .execute(Insert(overdue.clone()))
            .await
            .unwrap();
        svc.database()
            .execute(Insert(current.clone()))
            .await
            .unwrap();

        let task = MarkOverdueRentals {
            config: svc.config().mark_overdue_rentals,
            service: svc.clone(),
        };
        task.execute(Perform(())).await.unwrap();

        let swept = svc
            .database()
            .execute(Select(By::<Option<Rental>, _>::new(overdue.id)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(swept.status, rental::Status::Overdue);

        let untouched = svc
            .database()
            .execute(Select(By::<Option<Rental>, _>::new(current.id)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(untouched.status, rental::Status::Active);
    }
}
