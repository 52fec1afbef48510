//! capability → provider 등록부.
//!
//! 전역 상태 없이 composition root가 소유하는 명시적 객체로 구성하고,
//! [`ServiceRegistry::build`]로 만든 [`Resolver`]에서 인스턴스를 꺼낸다.

mod resolver;

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::application::config::ConfigurationTree;
use crate::error::StartupError;

pub use resolver::Resolver;

type Erased = Box<dyn Any + Send + Sync>;
type Factory = Box<dyn Fn(&Resolver) -> Result<Erased, StartupError> + Send + Sync>;

pub(crate) enum Provider {
    /// 이미 만들어진 값(바인딩된 옵션, 로거 핸들 등)
    Instance(Erased),
    /// 최초 해석 시 생성 후 캐시되는 singleton
    Singleton {
        factory: Factory,
        instance: OnceLock<Erased>,
    },
}

pub(crate) struct Registration {
    pub capability: &'static str,
    pub provider: Provider,
}

/// 서비스 등록부. 설정 트리를 소유하고 옵션 바인딩에 사용한다.
pub struct ServiceRegistry {
    configuration: ConfigurationTree,
    registrations: HashMap<TypeId, Registration>,
}

impl ServiceRegistry {
    pub fn new(configuration: ConfigurationTree) -> Self {
        Self {
            configuration,
            registrations: HashMap::new(),
        }
    }

    pub fn configuration(&self) -> &ConfigurationTree {
        &self.configuration
    }

    /// 이미 만들어진 값을 `T`로 해석되도록 등록한다.
    pub fn register_instance<T>(&mut self, value: T) -> &mut Self
    where
        T: Send + Sync + 'static,
    {
        self.insert::<T>(Provider::Instance(Box::new(Arc::new(value))))
    }

    /// capability `C`의 singleton provider를 등록한다.
    /// 같은 capability를 다시 등록하면 이전 provider를 대체한다.
    pub fn register_singleton<C, F>(&mut self, factory: F) -> &mut Self
    where
        C: ?Sized + Send + Sync + 'static,
        F: Fn(&Resolver) -> Result<Arc<C>, StartupError> + Send + Sync + 'static,
    {
        let factory: Factory = Box::new(move |resolver: &Resolver| {
            factory(resolver).map(|instance| Box::new(instance) as Erased)
        });
        self.insert::<C>(Provider::Singleton {
            factory,
            instance: OnceLock::new(),
        })
    }

    /// 설정 섹션을 `T`로 한 번 바인딩해 인스턴스로 등록한다.
    pub fn bind_options<T>(&mut self, section: &str) -> Result<&mut Self, StartupError>
    where
        T: DeserializeOwned + Default + Send + Sync + 'static,
    {
        let view = self.configuration.section(section);
        if !view.exists() {
            debug!(section, options = type_name::<T>(), "section missing, binding defaults");
        }
        let bound: T = view.bind()?;
        Ok(self.register_instance(bound))
    }

    pub fn is_registered<C>(&self) -> bool
    where
        C: ?Sized + 'static,
    {
        self.registrations.contains_key(&TypeId::of::<C>())
    }

    pub fn build(self) -> Resolver {
        Resolver::new(self.registrations)
    }

    fn insert<C>(&mut self, provider: Provider) -> &mut Self
    where
        C: ?Sized + 'static,
    {
        self.registrations.insert(
            TypeId::of::<C>(),
            Registration {
                capability: type_name::<C>(),
                provider,
            },
        );
        self
    }
}
