//! 등록부로부터 인스턴스를 해석하는 resolver.

use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::sync::Arc;

use super::{Erased, Factory, Provider, Registration};
use crate::error::StartupError;

/// 빌드가 끝난 등록부. singleton 인스턴스를 캐시한다.
///
/// factory에는 생성 중인 capability 경로를 담은 하위 resolver가 전달되므로
/// 순환 의존 탐지는 호출 경로마다 독립적이다.
pub struct Resolver {
    registrations: Arc<HashMap<TypeId, Registration>>,
    // 현재 호출 경로에서 생성 중인 capability
    chain: Vec<TypeId>,
}

impl Resolver {
    pub(super) fn new(registrations: HashMap<TypeId, Registration>) -> Self {
        Self {
            registrations: Arc::new(registrations),
            chain: Vec::new(),
        }
    }

    /// capability `C`를 해석한다. singleton은 최초 해석 시 생성된다.
    ///
    /// 여러 스레드가 동시에 최초 해석을 하면 factory가 중복 실행될 수 있지만
    /// 먼저 캐시된 인스턴스 하나만 반환된다.
    pub fn resolve<C>(&self) -> Result<Arc<C>, StartupError>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let id = TypeId::of::<C>();
        let capability = type_name::<C>();

        let Some(registration) = self.registrations.get(&id) else {
            return Err(StartupError::resolution(capability, "no provider registered"));
        };

        let erased = match &registration.provider {
            Provider::Instance(value) => value,
            Provider::Singleton { factory, instance } => {
                if instance.get().is_none() {
                    let built = self.construct(id, registration.capability, factory)?;
                    // 이미 채워졌다면 먼저 만든 인스턴스를 유지한다.
                    let _ = instance.set(built);
                }
                instance.get().ok_or_else(|| {
                    StartupError::resolution(capability, "singleton was not initialised")
                })?
            }
        };

        erased.downcast_ref::<Arc<C>>().cloned().ok_or_else(|| {
            StartupError::resolution(capability, "registered provider has a different type")
        })
    }

    fn construct(
        &self,
        id: TypeId,
        capability: &'static str,
        factory: &Factory,
    ) -> Result<Erased, StartupError> {
        if self.chain.contains(&id) {
            return Err(StartupError::resolution(
                capability,
                "circular dependency detected",
            ));
        }

        let mut chain = self.chain.clone();
        chain.push(id);
        let scoped = Resolver {
            registrations: Arc::clone(&self.registrations),
            chain,
        };

        factory(&scoped).map_err(|err| match err {
            StartupError::Resolution {
                capability: dependency,
                reason,
            } if dependency != capability => StartupError::resolution(
                capability,
                format!("dependency '{dependency}' cannot be resolved: {reason}"),
            ),
            other => other,
        })
    }
}
