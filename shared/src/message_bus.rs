use std::{any::type_name, future::Future, mem};

use log::{debug, error, info};
use tokio::{
    select,
    sync::broadcast::{channel, Receiver, Sender},
};

use crate::{commands::Commands, events::Events};

pub struct BusSender {
    commands_sender: Sender<Commands>,
    events_sender: Sender<Events>,
}

pub struct MessageBus {
    sender: BusSender,
    commands_recv: Option<Receiver<Commands>>,
    events_recv: Option<Receiver<Events>>,
}

pub trait BusHandler<TContext> {
    fn event_handler(
        bus: &BusSender,
        context: &mut TContext,
        event: Events,
    ) -> impl Future<Output = ()> + Send;
    fn command_handler(
        bus: &BusSender,
        context: &mut TContext,
        command: Commands,
    ) -> impl Future<Output = ()> + Send;
}

impl Clone for MessageBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            commands_recv: None,
            events_recv: None,
        }
    }
}

impl BusSender {
    pub fn send_cmd(&self, command: Commands) {
        if let Err(err) = self.commands_sender.send(command) {
            error!("{:?}", err);
        }
    }

    pub fn send_event(&self, event: Events) {
        if let Err(err) = self.events_sender.send(event) {
            error!("{:?}", err);
        }
    }
}

impl Clone for BusSender {
    fn clone(&self) -> Self {
        Self {
            commands_sender: self.commands_sender.clone(),
            events_sender: self.events_sender.clone(),
        }
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageBus {
    pub fn new() -> Self {
        let (commands_sender, commands_recv) = channel::<Commands>(20);
        let (events_sender, events_recv) = channel::<Events>(64);

        Self {
            sender: BusSender {
                commands_sender,
                events_sender,
            },
            commands_recv: Some(commands_recv),
            events_recv: Some(events_recv),
        }
    }

    pub fn sender(&self) -> &BusSender {
        &self.sender
    }

    pub fn subscribe_commands(&self) -> Receiver<Commands> {
        self.sender.commands_sender.subscribe()
    }

    pub fn subscribe_events(&self) -> Receiver<Events> {
        self.sender.events_sender.subscribe()
    }

    /// Runs the handler until `Commands::Destroy` and hands the context back.
    #[inline]
    pub async fn handle<TContext, THandler>(mut bus: MessageBus, mut context: TContext) -> TContext
    where
        THandler: BusHandler<TContext>,
    {
        let handler_type = type_name::<THandler>();

        let size_of_context = mem::size_of::<TContext>();

        debug!("context {} bytes", size_of_context);

        info!("starting handle loop... {}", handler_type);

        let mut commands_receiver = match bus.commands_recv.take() {
            Some(receiver) => receiver,
            None => bus.sender.commands_sender.subscribe(),
        };

        let mut events_receiver = match bus.events_recv.take() {
            Some(receiver) => receiver,
            None => bus.sender.events_sender.subscribe(),
        };

        loop {
            let break_loop = Self::handle_command_or_event::<TContext, THandler>(
                &bus.sender,
                &mut commands_receiver,
                &mut events_receiver,
                &mut context,
                handler_type,
            )
            .await;

            if break_loop {
                break;
            }
        }

        info!("done {}", handler_type);

        context
    }

    async fn handle_command_or_event<TContext, THandler>(
        sender: &BusSender,
        commands_receiver: &mut Receiver<Commands>,
        events_receiver: &mut Receiver<Events>,
        context: &mut TContext,
        handler_type: &str,
    ) -> bool
    where
        THandler: BusHandler<TContext>,
    {
        let mut break_loop = false;

        // events queued ahead of a teardown are still applied
        select! {
            biased;

            event_res = events_receiver.recv() => {
                match event_res {
                    Ok(event) => THandler::event_handler(sender, context, event).await,
                    Err(err) => {error!("{:?} {:?}", err, handler_type)},
                }
            }
            command_res = commands_receiver.recv() => {
                match command_res {
                    Ok(command) => {
                        if matches!(command, Commands::Destroy) {
                            break_loop = true;
                        }

                        THandler::command_handler(sender, context, command).await;
                    },
                    Err(err) => {error!("{:?} {:?}", err, handler_type)},
                }
            }
        }

        break_loop
    }

    pub fn send_cmd(&self, command: Commands) {
        self.sender.send_cmd(command);
    }

    pub fn send_event(&self, event: Events) {
        self.sender.send_event(event);
    }
}
